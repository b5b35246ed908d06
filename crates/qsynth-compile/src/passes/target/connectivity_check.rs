//! Optional device-connectivity checker.
//!
//! This is the full extent of "hardware routing" this crate does: no pass
//! ever inserts a SWAP to satisfy connectivity. `ConnectivityCheck` only
//! flags two-qubit gates that a [`Layout`](crate::property::Layout) places
//! on physical qubits the [`CouplingMap`](crate::property::CouplingMap)
//! does not connect, so a caller can reject or re-synthesize the circuit.

use qsynth_ir::CircuitDag;

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

pub struct ConnectivityCheck;

impl Pass for ConnectivityCheck {
    fn name(&self) -> &'static str {
        "ConnectivityCheck"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;
        let layout = properties.layout.as_ref().ok_or(CompileError::MissingLayout)?;

        for (_, inst) in dag.topological_ops() {
            if inst.qubits.len() != 2 {
                continue;
            }
            let (q0, q1) = (inst.qubits[0], inst.qubits[1]);
            let (Some(p0), Some(p1)) = (layout.get_physical(q0), layout.get_physical(q1)) else {
                continue;
            };
            if !coupling_map.is_connected(p0, p1) {
                return Err(CompileError::ConnectivityViolation {
                    gate_name: inst.name(),
                    q0: p0,
                    q1: p1,
                });
            }
        }

        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.coupling_map.is_some() && properties.layout.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Layout, CouplingMap};
    use qsynth_ir::{QCir, QubitId};

    #[test]
    fn test_connected_gate_passes() {
        let mut circuit = QCir::with_size("test", 2, 0);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let mut dag = circuit.into_dag();

        let mut props = PropertySet::new();
        props.coupling_map = Some(CouplingMap::linear(2));
        props.layout = Some(Layout::trivial(2));

        ConnectivityCheck.run(&mut dag, &mut props).unwrap();
    }

    #[test]
    fn test_disconnected_gate_fails() {
        let mut circuit = QCir::with_size("test", 3, 0);
        circuit.cx(QubitId(0), QubitId(2)).unwrap();
        let mut dag = circuit.into_dag();

        let mut props = PropertySet::new();
        props.coupling_map = Some(CouplingMap::linear(3));
        props.layout = Some(Layout::trivial(3));

        let result = ConnectivityCheck.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::ConnectivityViolation { .. })));
    }
}
