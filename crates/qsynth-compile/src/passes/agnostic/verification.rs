//! Verification passes for ensuring compilation correctness.
//!
//! These passes validate that optimization passes have not introduced
//! incorrect transformations, particularly around measurement ordering.

use rustc_hash::FxHashMap;
use tracing::debug;

use petgraph::visit::EdgeRef;
use qsynth_ir::{CircuitDag, DagNode, QubitId, WireId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of measurement barrier verification.
#[derive(Debug, Clone, Default)]
pub struct VerificationResult {
    /// Whether the verification passed.
    pub passed: bool,
    /// Number of qubits verified.
    pub qubits_checked: usize,
    /// Number of measurements found.
    pub measurements_found: usize,
}

/// Analysis pass that verifies no optimization has moved gates across
/// measurement boundaries.
///
/// Walks each qubit's wire from its input node to its output node and
/// confirms the topological position of every operation along that wire
/// is monotonically increasing. A rewrite that reordered a gate across a
/// measurement (or anything else) on the same wire would show up as a
/// decrease.
///
/// This pass should be added after all optimization passes to catch any
/// correctness violations.
pub struct MeasurementBarrierVerification;

impl Pass for MeasurementBarrierVerification {
    fn name(&self) -> &'static str {
        "measurement_barrier_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    #[allow(clippy::unused_self, clippy::unnecessary_wraps)]
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let mut qubits_checked: FxHashMap<QubitId, ()> = FxHashMap::default();
        let mut measurements_found = 0;
        for (_, inst) in dag.topological_ops() {
            if inst.is_measure() {
                measurements_found += 1;
            }
            for &qubit in &inst.qubits {
                qubits_checked.insert(qubit, ());
            }
        }

        let graph = dag.graph();
        for qubit in dag.qubits().collect::<Vec<_>>() {
            let wire = WireId::Qubit(qubit);

            let Some(start) = graph
                .node_indices()
                .find(|&idx| matches!(&graph[idx], DagNode::In(w) if *w == wire))
            else {
                continue;
            };

            let mut current = start;
            let mut prev_position: Option<usize> = None;

            loop {
                let next = graph
                    .edges_directed(current, petgraph::Direction::Outgoing)
                    .find(|e| e.weight().wire == wire)
                    .map(|e| e.target());

                let Some(next_node) = next else { break };

                if let DagNode::Op(inst) = &graph[next_node] {
                    let topo_pos = dag.topological_ops().position(|(idx, _)| idx == next_node);

                    if let (Some(prev), Some(curr)) = (prev_position, topo_pos) {
                        if curr < prev {
                            return Err(CompileError::MeasurementViolation {
                                gate_name: inst.name(),
                                qubit: qubit.0 as usize,
                                detail: format!(
                                    "operation '{}' on qubit {} has topological position {curr} \
                                     but follows an operation at position {prev} on the same wire",
                                    inst.name(),
                                    qubit.0,
                                ),
                            });
                        }
                    }

                    prev_position = topo_pos;
                }
                current = next_node;

                if matches!(&graph[current], DagNode::Out(_)) {
                    break;
                }
            }
        }

        let result = VerificationResult {
            passed: true,
            qubits_checked: qubits_checked.len(),
            measurements_found,
        };

        debug!(
            "measurement barrier verification passed: {} qubits checked, {} measurements found",
            result.qubits_checked, result.measurements_found
        );

        properties.insert(result);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsynth_ir::{ClbitId, QCir};

    fn run_verification(circuit: &QCir) -> CompileResult<VerificationResult> {
        let mut dag = circuit.clone().into_dag();
        let mut props = PropertySet::new();
        let pass = MeasurementBarrierVerification;
        pass.run(&mut dag, &mut props)?;
        Ok(props.get::<VerificationResult>().unwrap().clone())
    }

    #[test]
    fn test_simple_circuit_passes() {
        let mut circuit = QCir::with_size("test", 2, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.measure(QubitId(1), ClbitId(1)).unwrap();

        let result = run_verification(&circuit).unwrap();
        assert!(result.passed);
        assert_eq!(result.qubits_checked, 2);
        assert_eq!(result.measurements_found, 2);
    }

    #[test]
    fn test_empty_circuit() {
        let circuit = QCir::with_size("test", 2, 0);
        let result = run_verification(&circuit).unwrap();
        assert!(result.passed);
        assert_eq!(result.measurements_found, 0);
    }
}
