//! The quantum operation catalog: a closed sum type over every gate kind the
//! synthesis pipeline understands.
//!
//! Per the "avoid open dynamic dispatch" design choice, `Operation` is a
//! tagged variant rather than a trait object: every new gate kind is added
//! here, and the catalog-level queries (`adjoint`, `is_clifford`,
//! `to_basic_gates`) dispatch on the tag instead of going through a vtable.
//! Crates downstream (ZX construction, tableau translation) add their own
//! `to_zxgraph`/`append_to_tableau`-style functions over the same tag rather
//! than growing this enum with foreign concerns.

use std::fmt;

use qsynth_core::Phase;

use crate::error::{GateError, GateResult};

/// A classical condition gating an [`Operation::IfElse`]: the instruction
/// only applies when the classical register masked by `bit_or_mask` equals
/// `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassicalCondition {
    pub bit_or_mask: u64,
    pub value: u64,
}

impl ClassicalCondition {
    pub fn new(bit_or_mask: u64, value: u64) -> Self {
        Self { bit_or_mask, value }
    }
}

/// A quantum operation. Every variant is a member of the closed catalog
/// described by the data model: `Id`, `H`, `ECR` are nullary-phase
/// Cliffords; `Pz`/`Px`/`Py` and `Rz`/`Rx`/`Ry` are single-qubit axis
/// rotations that differ pairwise by a global phase; `Control` wraps an
/// inner operation with `n_ctrls` leading control qubits; `Swap`, `U`,
/// `Measurement`, and `IfElse` round out the set.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Id,
    H,
    Ecr,
    Pz(Phase),
    Px(Phase),
    Py(Phase),
    Rz(Phase),
    Rx(Phase),
    Ry(Phase),
    Control { op: Box<Operation>, n_ctrls: u32 },
    Swap,
    U(Phase, Phase, Phase),
    Measurement,
    IfElse {
        op: Box<Operation>,
        condition: ClassicalCondition,
    },
}

impl Operation {
    /// Build a `Control` wrapping `op` with `n_ctrls` controls.
    pub fn control(op: Operation, n_ctrls: u32) -> Operation {
        Operation::Control {
            op: Box::new(op),
            n_ctrls,
        }
    }

    /// Build an `IfElse` wrapping `op` under `condition`.
    pub fn if_else(op: Operation, condition: ClassicalCondition) -> Operation {
        Operation::IfElse {
            op: Box::new(op),
            condition,
        }
    }

    // --- Pauli / Clifford convenience constructors, expressed as the
    // underlying Pz/Px/Py/Rz family per the data model (e.g. X == Px(pi)
    // exactly, with no extra global phase). ---

    pub fn x() -> Operation {
        Operation::Px(Phase::pi())
    }
    pub fn y() -> Operation {
        Operation::Py(Phase::pi())
    }
    pub fn z() -> Operation {
        Operation::Pz(Phase::pi())
    }
    pub fn s() -> Operation {
        Operation::Pz(Phase::new(1, 2))
    }
    pub fn sdg() -> Operation {
        Operation::Pz(Phase::new(-1, 2))
    }
    pub fn t() -> Operation {
        Operation::Pz(Phase::new(1, 4))
    }
    pub fn tdg() -> Operation {
        Operation::Pz(Phase::new(-1, 4))
    }
    pub fn sx() -> Operation {
        Operation::Rx(Phase::new(1, 2))
    }
    pub fn sxdg() -> Operation {
        Operation::Rx(Phase::new(-1, 2))
    }
    pub fn cx() -> Operation {
        Operation::control(Operation::x(), 1)
    }
    pub fn cy() -> Operation {
        Operation::control(Operation::y(), 1)
    }
    pub fn cz() -> Operation {
        Operation::control(Operation::z(), 1)
    }
    pub fn ccx() -> Operation {
        Operation::control(Operation::x(), 2)
    }
    pub fn ccz() -> Operation {
        Operation::control(Operation::z(), 2)
    }

    /// A short mnemonic for the operation type, e.g. `"h"`, `"cx"`, `"ccz"`.
    pub fn get_type(&self) -> String {
        match self {
            Operation::Id => "id".to_string(),
            Operation::H => "h".to_string(),
            Operation::Ecr => "ecr".to_string(),
            Operation::Pz(_) => "pz".to_string(),
            Operation::Px(_) => "px".to_string(),
            Operation::Py(_) => "py".to_string(),
            Operation::Rz(_) => "rz".to_string(),
            Operation::Rx(_) => "rx".to_string(),
            Operation::Ry(_) => "ry".to_string(),
            Operation::Swap => "swap".to_string(),
            Operation::U(..) => "u".to_string(),
            Operation::Measurement => "measure".to_string(),
            Operation::IfElse { op, .. } => format!("if_else({})", op.get_type()),
            Operation::Control { op, n_ctrls } => {
                let prefix = "c".repeat(*n_ctrls as usize);
                format!("{prefix}{}", op.get_type())
            }
        }
    }

    /// A canonical human-readable form, including the phase angle where
    /// applicable, e.g. `"pz(π/4)"`.
    pub fn get_repr(&self) -> String {
        match self {
            Operation::Pz(p) | Operation::Px(p) | Operation::Py(p) | Operation::Rz(p)
            | Operation::Rx(p) | Operation::Ry(p) => {
                format!("{}({})", self.get_type(), p.get_print_string())
            }
            Operation::U(theta, phi, lambda) => format!(
                "u({}, {}, {})",
                theta.get_print_string(),
                phi.get_print_string(),
                lambda.get_print_string()
            ),
            Operation::Control { op, n_ctrls } => {
                format!("c{}[{}]", op.get_repr(), n_ctrls)
            }
            Operation::IfElse { op, condition } => {
                format!(
                    "if(&{} == {}) {}",
                    condition.bit_or_mask,
                    condition.value,
                    op.get_repr()
                )
            }
            _ => self.get_type(),
        }
    }

    /// The number of qubits this operation acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Operation::Id | Operation::H => 1,
            Operation::Ecr => 2,
            Operation::Pz(_) | Operation::Px(_) | Operation::Py(_) => 1,
            Operation::Rz(_) | Operation::Rx(_) | Operation::Ry(_) => 1,
            Operation::Control { op, n_ctrls } => n_ctrls + op.num_qubits(),
            Operation::Swap => 2,
            Operation::U(..) => 1,
            Operation::Measurement => 1,
            Operation::IfElse { op, .. } => op.num_qubits(),
        }
    }

    /// The adjoint (inverse) operation. `Id`/`H`/`Swap`/`ECR` are their own
    /// adjoint by construction; `Measurement` has no meaningful adjoint and
    /// is returned unchanged as a structural placeholder.
    pub fn adjoint(&self) -> Operation {
        match self {
            Operation::Id
            | Operation::H
            | Operation::Swap
            | Operation::Ecr
            | Operation::Measurement => self.clone(),
            Operation::Pz(p) => Operation::Pz(-*p),
            Operation::Px(p) => Operation::Px(-*p),
            Operation::Py(p) => Operation::Py(-*p),
            Operation::Rz(p) => Operation::Rz(-*p),
            Operation::Rx(p) => Operation::Rx(-*p),
            Operation::Ry(p) => Operation::Ry(-*p),
            Operation::Control { op, n_ctrls } => Operation::Control {
                op: Box::new(op.adjoint()),
                n_ctrls: *n_ctrls,
            },
            Operation::U(theta, phi, lambda) => Operation::U(-*theta, -*lambda, -*phi),
            Operation::IfElse { op, condition } => Operation::IfElse {
                op: Box::new(op.adjoint()),
                condition: *condition,
            },
        }
    }

    /// Whether this operation lies in the Clifford group.
    pub fn is_clifford(&self) -> bool {
        match self {
            Operation::Id | Operation::H | Operation::Swap | Operation::Ecr => true,
            Operation::Pz(p) | Operation::Px(p) | Operation::Py(p) => p.is_clifford_angle(),
            Operation::Rz(p) | Operation::Rx(p) | Operation::Ry(p) => p.is_clifford_angle(),
            Operation::U(..) => false,
            Operation::Measurement => false,
            Operation::Control { op, n_ctrls } => *n_ctrls == 1 && is_exact_pauli(op),
            Operation::IfElse { op, .. } => op.is_clifford(),
        }
    }

    /// Decompose into a list of `(operation, local qubit indices)` pairs,
    /// where the indices refer to positions in this gate's own qubit list
    /// (not global circuit qubit ids). Returns
    /// [`GateError::NotDecomposable`] for `Measurement`, `IfElse`, and
    /// over-large `Control`s.
    pub fn to_basic_gates(&self) -> GateResult<Vec<(Operation, Vec<usize>)>> {
        match self {
            Operation::Measurement => Err(GateError::NotDecomposable("measurement".to_string())),
            Operation::IfElse { .. } => Err(GateError::NotDecomposable("if_else".to_string())),
            Operation::U(theta, phi, lambda) => Ok(vec![
                (Operation::Rz(*lambda), vec![0]),
                (Operation::Ry(*theta), vec![0]),
                (Operation::Rz(*phi), vec![0]),
            ]),
            Operation::Swap => {
                let cx = Operation::cx();
                Ok(vec![
                    (cx.clone(), vec![0, 1]),
                    (cx.clone(), vec![1, 0]),
                    (cx, vec![0, 1]),
                ])
            }
            Operation::Control { op, n_ctrls } => decompose_controlled(op, *n_ctrls),
            Operation::Id
            | Operation::H
            | Operation::Ecr
            | Operation::Pz(_)
            | Operation::Px(_)
            | Operation::Py(_)
            | Operation::Rz(_)
            | Operation::Rx(_)
            | Operation::Ry(_) => {
                let qubits: Vec<usize> = (0..self.num_qubits() as usize).collect();
                Ok(vec![(self.clone(), qubits)])
            }
        }
    }
}

fn is_exact_pauli(op: &Operation) -> bool {
    let pi = Phase::pi();
    matches!(op, Operation::Px(p) | Operation::Py(p) | Operation::Pz(p) if *p == pi)
}

/// Decompose a `Control(op, n_ctrls)` gate.
///
/// A single control over an exact Pauli (i.e. already `CX`/`CY`/`CZ`) is
/// basic and returned unchanged. Two controls over an exact Pauli use the
/// canonical 7-`T` Toffoli-family decomposition, conjugating the target
/// into the `Z` basis first when the target Pauli is `X` or `Y`. Anything
/// wider is not decomposable here.
fn decompose_controlled(op: &Operation, n_ctrls: u32) -> GateResult<Vec<(Operation, Vec<usize>)>> {
    if n_ctrls == 1 && is_exact_pauli(op) {
        let qubits: Vec<usize> = (0..=op.num_qubits() as usize).collect();
        return Ok(vec![(
            Operation::Control {
                op: Box::new(op.clone()),
                n_ctrls,
            },
            qubits,
        )]);
    }

    if n_ctrls == 2 && is_exact_pauli(op) {
        return Ok(decompose_ccz_family(op));
    }

    Err(GateError::NotDecomposable(format!(
        "control({}, {n_ctrls})",
        op.get_type()
    )))
}

/// The canonical 7-`T` decomposition for a doubly-controlled Pauli on
/// qubits `(a=0, b=1, t=2)`, conjugating the target into the `Z` basis for
/// `CCX`/`CCY` and back out afterwards.
fn decompose_ccz_family(target: &Operation) -> Vec<(Operation, Vec<usize>)> {
    let (pre, post) = match target {
        Operation::Px(_) => (vec![(Operation::H, vec![2])], vec![(Operation::H, vec![2])]),
        Operation::Py(_) => (
            vec![(Operation::sdg(), vec![2]), (Operation::H, vec![2])],
            vec![(Operation::H, vec![2]), (Operation::s(), vec![2])],
        ),
        _ => (vec![], vec![]),
    };

    let t = Operation::t();
    let tdg = Operation::tdg();
    let cx = Operation::cx();

    let mut seq = pre;
    seq.extend([
        (t.clone(), vec![2]),
        (cx.clone(), vec![1, 2]),
        (tdg.clone(), vec![2]),
        (cx.clone(), vec![0, 2]),
        (t.clone(), vec![2]),
        (cx.clone(), vec![1, 2]),
        (tdg.clone(), vec![2]),
        (t.clone(), vec![1]),
        (cx.clone(), vec![0, 1]),
        (t, vec![0]),
        (tdg, vec![1]),
        (cx, vec![0, 1]),
    ]);
    seq.extend(post);
    seq
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get_repr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_qubits() {
        assert_eq!(Operation::H.num_qubits(), 1);
        assert_eq!(Operation::Ecr.num_qubits(), 2);
        assert_eq!(Operation::cx().num_qubits(), 2);
        assert_eq!(Operation::ccx().num_qubits(), 3);
    }

    #[test]
    fn test_adjoint_negates_phase() {
        let g = Operation::Rz(Phase::new(1, 4));
        assert_eq!(g.adjoint(), Operation::Rz(Phase::new(-1, 4)));
    }

    #[test]
    fn test_adjoint_self_for_structural_gates() {
        assert_eq!(Operation::H.adjoint(), Operation::H);
        assert_eq!(Operation::Swap.adjoint(), Operation::Swap);
        assert_eq!(Operation::Ecr.adjoint(), Operation::Ecr);
    }

    #[test]
    fn test_is_clifford() {
        assert!(Operation::H.is_clifford());
        assert!(Operation::s().is_clifford());
        assert!(!Operation::t().is_clifford());
        assert!(Operation::cx().is_clifford());
        assert!(!Operation::ccx().is_clifford());
    }

    #[test]
    fn test_swap_decomposes_to_three_cx() {
        let basic = Operation::Swap.to_basic_gates().unwrap();
        assert_eq!(basic.len(), 3);
        for (op, qubits) in &basic {
            assert_eq!(*op, Operation::cx());
            assert_eq!(qubits.len(), 2);
        }
    }

    #[test]
    fn test_ccz_decomposes_to_seven_t_sequence() {
        // End-to-end scenario: CCZ(0,1,2) -> the exact 7-T sequence.
        let basic = Operation::ccz().to_basic_gates().unwrap();
        assert_eq!(basic.len(), 12);
        assert_eq!(basic[0], (Operation::t(), vec![2]));
        assert_eq!(basic[1], (Operation::cx(), vec![1, 2]));
        assert_eq!(basic[2], (Operation::tdg(), vec![2]));
        assert_eq!(basic[3], (Operation::cx(), vec![0, 2]));
        assert_eq!(basic[4], (Operation::t(), vec![2]));
        assert_eq!(basic[5], (Operation::cx(), vec![1, 2]));
        assert_eq!(basic[6], (Operation::tdg(), vec![2]));
        assert_eq!(basic[7], (Operation::t(), vec![1]));
        assert_eq!(basic[8], (Operation::cx(), vec![0, 1]));
        assert_eq!(basic[9], (Operation::t(), vec![0]));
        assert_eq!(basic[10], (Operation::tdg(), vec![1]));
        assert_eq!(basic[11], (Operation::cx(), vec![0, 1]));
    }

    #[test]
    fn test_measurement_not_decomposable() {
        assert!(Operation::Measurement.to_basic_gates().is_err());
    }

    #[test]
    fn test_if_else_adjoint_keeps_condition() {
        let cond = ClassicalCondition::new(0b1, 1);
        let g = Operation::if_else(Operation::x(), cond);
        let adj = g.adjoint();
        match adj {
            Operation::IfElse { op, condition } => {
                assert_eq!(*op, Operation::x());
                assert_eq!(condition, cond);
            }
            _ => panic!("expected IfElse"),
        }
    }
}
