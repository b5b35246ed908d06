//! Rewrite gates into a named target's native equivalence library.
//!
//! The library maps a gate's canonical representation to an ordered
//! sequence of (operation, local-qubit-index) pairs using only that
//! target's native ops; local indices are positions in the original gate's
//! own qubit list. A gate missing from the library is appended unchanged —
//! this pass never fails on an untranslatable gate, it assumes the host
//! already validated the target covers what it needs to.

use rustc_hash::FxHashMap;

use qsynth_core::Phase;
use qsynth_ir::{CircuitDag, Instruction, Operation, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

type Equivalence = Vec<(Operation, Vec<usize>)>;

pub struct Translator;

impl Pass for Translator {
    fn name(&self) -> &'static str {
        "Translator"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let target = properties
            .translation_target
            .as_deref()
            .ok_or(CompileError::MissingBasisGates)?;
        let library = equivalence_library(target).ok_or_else(|| {
            CompileError::GateNotInBasis(format!("no equivalence library for target '{target}'"))
        })?;

        let mut new_dag = CircuitDag::new();
        for qubit in dag.qubits().collect::<Vec<_>>() {
            new_dag.add_qubit(qubit);
        }
        for clbit in dag.clbits().collect::<Vec<_>>() {
            new_dag.add_clbit(clbit);
        }
        new_dag.set_global_phase(dag.global_phase());
        new_dag.set_level(dag.level());

        for (_idx, inst) in dag.topological_ops() {
            match library.get(&inst.op.get_repr()) {
                Some(sequence) => {
                    for (op, local) in sequence {
                        let qubits: Vec<QubitId> =
                            local.iter().map(|&i| inst.qubits[i]).collect();
                        new_dag.apply(Instruction::gate(op.clone(), qubits))?;
                    }
                }
                None => {
                    new_dag.apply(inst.clone())?;
                }
            }
        }

        *dag = new_dag;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.translation_target.is_some()
    }
}

/// Built-in equivalence libraries, keyed by target name.
///
/// Each only covers the handful of non-native gates a hardware-native
/// basis commonly needs rewritten; anything already native to the target
/// (or simply absent from the library) passes through untouched.
fn equivalence_library(target: &str) -> Option<FxHashMap<String, Equivalence>> {
    let mut lib = FxHashMap::default();
    match target {
        // IBM "sherbrooke"/"kyiv"-style: native RZ, SX, X, CX.
        "sherbrooke" | "kyiv" => {
            lib.insert(Operation::H.get_repr(), vec![
                (Operation::Rz(Phase::new(1, 2)), vec![0]),
                (Operation::Rx(Phase::new(1, 2)), vec![0]),
                (Operation::Rz(Phase::new(1, 2)), vec![0]),
            ]);
            lib.insert(Operation::cz().get_repr(), vec![
                (Operation::Rz(Phase::new(1, 2)), vec![1]),
                (Operation::Rx(Phase::new(1, 2)), vec![1]),
                (Operation::Rz(Phase::new(1, 2)), vec![1]),
                (Operation::cx(), vec![0, 1]),
                (Operation::Rz(Phase::new(1, 2)), vec![1]),
                (Operation::Rx(Phase::new(1, 2)), vec![1]),
                (Operation::Rz(Phase::new(1, 2)), vec![1]),
            ]);
        }
        // IQM "prague"-style: native PRX (Rx/Ry combination, here Rx/Ry
        // directly) + CZ.
        "prague" => {
            lib.insert(
                Operation::cx().get_repr(),
                vec![
                    (Operation::Ry(-Phase::new(1, 2)), vec![1]),
                    (Operation::cz(), vec![0, 1]),
                    (Operation::Ry(Phase::new(1, 2)), vec![1]),
                ],
            );
        }
        _ => return None,
    }
    Some(lib)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsynth_ir::QCir;

    #[test]
    fn test_unknown_target_errors() {
        let mut circuit = QCir::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new();
        props.translation_target = Some("nonexistent".to_string());

        let result = Translator.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::GateNotInBasis(_))));
    }

    #[test]
    fn test_h_translated_for_sherbrooke() {
        let mut circuit = QCir::with_size("test", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new();
        props.translation_target = Some("sherbrooke".to_string());

        Translator.run(&mut dag, &mut props).unwrap();
        assert_eq!(dag.num_ops(), 3);
    }

    #[test]
    fn test_gate_outside_library_passes_through() {
        let mut circuit = QCir::with_size("test", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new();
        props.translation_target = Some("sherbrooke".to_string());

        Translator.run(&mut dag, &mut props).unwrap();
        assert_eq!(dag.num_ops(), 1);
    }
}
