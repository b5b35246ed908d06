//! Translating a [`QCir`] into an interleaved sequence of Clifford blocks
//! and Pauli-rotation blocks (§4.H), and back (§4.J, in `resynthesis.rs`).

use qsynth_core::Phase;
use qsynth_ir::{Operation, QCir};

use crate::error::{TableauError, TableauResult};
use crate::pauli_rotation::PauliRotation;
use crate::tableau::StabilizerTableau;

/// One block of a [`PauliRotationTableau`]: either an accumulated Clifford
/// or a run of Pauli rotations.
#[derive(Debug, Clone, PartialEq)]
pub enum TableauBlock {
    Clifford(StabilizerTableau),
    Rotations(Vec<PauliRotation>),
}

/// A `QCir` translated into alternating Clifford/rotation blocks, the
/// working representation for the resynthesis strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliRotationTableau {
    pub n_qubits: usize,
    pub blocks: Vec<TableauBlock>,
}

impl PauliRotationTableau {
    pub fn new(n_qubits: usize) -> Self {
        PauliRotationTableau {
            n_qubits,
            blocks: Vec::new(),
        }
    }

    /// All rotations across every [`TableauBlock::Rotations`] block, in
    /// order, flattened (Clifford blocks dropped). Used by strategies that
    /// operate over the full rotation list and fold the interleaved
    /// Cliffords into a single residual at the end.
    pub fn flatten_rotations(&self) -> Vec<PauliRotation> {
        self.blocks
            .iter()
            .flat_map(|b| match b {
                TableauBlock::Rotations(rs) => rs.clone(),
                TableauBlock::Clifford(_) => Vec::new(),
            })
            .collect()
    }
}

/// Translate `circuit` gate by gate into a [`PauliRotationTableau`].
///
/// Clifford generators accumulate into a running [`StabilizerTableau`];
/// `Pz`/`Px`/`Py` (optionally `Control`led) rotations expand into a list of
/// diagonal Pauli-`Z` rotations conjugated back to the gate's own axis.
/// Adjacent blocks of the same kind are merged as they are produced.
pub fn qc_to_tableau(circuit: &QCir) -> TableauResult<PauliRotationTableau> {
    let n = circuit.num_qubits();
    let mut out = PauliRotationTableau::new(n);
    let mut current_clifford = StabilizerTableau::identity(n);
    let mut has_pending_clifford = false;

    let mut flush_clifford = |out: &mut PauliRotationTableau,
                               current: &mut StabilizerTableau,
                               pending: &mut bool| {
        if *pending {
            out.blocks.push(TableauBlock::Clifford(std::mem::replace(
                current,
                StabilizerTableau::identity(n),
            )));
            *pending = false;
        }
    };

    for (_, instr) in circuit.dag().topological_ops() {
        let qubits: Vec<usize> = instr.qubits.iter().map(|q| q.0).collect();
        if instr.op.is_clifford() {
            current_clifford.apply_operation(&instr.op, &qubits).map_err(|e| {
                TableauError::Unsupported(format!("{e} while folding a Clifford run"))
            })?;
            has_pending_clifford = true;
            continue;
        }

        let (pre, rotations, post) = expand_non_clifford(&instr.op, &qubits, n)?;
        flush_clifford(&mut out, &mut current_clifford, &mut has_pending_clifford);
        if !pre.is_empty() {
            let mut c = StabilizerTableau::identity(n);
            for g in &pre {
                c.apply_clifford_gate(*g);
            }
            out.blocks.push(TableauBlock::Clifford(c));
        }
        match out.blocks.last_mut() {
            Some(TableauBlock::Rotations(rs)) => rs.extend(rotations),
            _ => out.blocks.push(TableauBlock::Rotations(rotations)),
        }
        if !post.is_empty() {
            let mut c = StabilizerTableau::identity(n);
            for g in &post {
                c.apply_clifford_gate(*g);
            }
            out.blocks.push(TableauBlock::Clifford(c));
        }
    }
    flush_clifford(&mut out, &mut current_clifford, &mut has_pending_clifford);
    Ok(out)
}

/// Axis-conjugation gates applied to `target` before emitting a diagonal
/// rotation on it, so that the final `Z`-rotations realize a `Pa`/`Ra`: `H`
/// for `X`, `Sdg` then `H` for `Y`, nothing for `Z`. The inverse (`post`)
/// sequence restores the native axis.
fn axis_conjugate_gates(axis: &Operation, target: usize) -> TableauResult<(Vec<crate::tableau::CliffordGate>, Vec<crate::tableau::CliffordGate>)> {
    use crate::tableau::CliffordGate::{H, S, Sdg};
    match axis {
        Operation::Px(_) | Operation::Rx(_) => Ok((vec![H(target)], vec![H(target)])),
        Operation::Py(_) | Operation::Ry(_) => {
            Ok((vec![Sdg(target), H(target)], vec![H(target), S(target)]))
        }
        Operation::Pz(_) | Operation::Rz(_) => Ok((vec![], vec![])),
        other => Err(TableauError::Unsupported(format!(
            "{} has no rotation axis",
            other.get_type()
        ))),
    }
}

/// Expand a non-Clifford `Pz`/`Px`/`Py`/`Rz`/`Rx`/`Ry`, optionally
/// multi-controlled, into a `(pre, rotations, post)` triple: `pre`/`post`
/// are the Clifford conjugations bringing the target to/from its native
/// axis, and `rotations` is the diagonal Pauli-`Z`-rotation decomposition
/// (§4.H). `Control(Pa, n_ctrls)` with `n_ctrls <= 1` and an exact-π phase
/// is special-cased to `CX`/`CY`/`CZ` upstream (those are Clifford and
/// never reach here); everything else reduces to the general controlled-
/// phase case: `2^{n_ctrls}` rotations of magnitude `phase / 2^{n_ctrls -
/// 1}`, alternating sign by the parity of the chosen control subset.
fn expand_non_clifford(
    op: &Operation,
    qubits: &[usize],
    n: usize,
) -> TableauResult<(Vec<crate::tableau::CliffordGate>, Vec<PauliRotation>, Vec<crate::tableau::CliffordGate>)> {
    let (inner, controls, target) = match op {
        Operation::Control { op: inner, n_ctrls } => {
            let n_ctrls = *n_ctrls as usize;
            (inner.as_ref(), qubits[..n_ctrls].to_vec(), qubits[n_ctrls])
        }
        _ => (op, Vec::new(), qubits[0]),
    };

    let phase = match inner {
        Operation::Pz(p) | Operation::Px(p) | Operation::Py(p) => *p,
        Operation::Rz(p) | Operation::Rx(p) | Operation::Ry(p) => *p,
        other => {
            return Err(TableauError::Unsupported(format!(
                "{} is not a phase/rotation gate",
                other.get_type()
            )));
        }
    };

    let (pre, post) = axis_conjugate_gates(inner, target)?;

    let k = controls.len();
    let divisor = 1i64 << k.saturating_sub(1);
    let magnitude = phase.div_int(divisor);

    let mut rotations = Vec::with_capacity(1 << k);
    for mask in 0..(1usize << k) {
        let mut z = vec![false; n];
        z[target] = true;
        let mut parity = false;
        for (i, &c) in controls.iter().enumerate() {
            if mask & (1 << i) != 0 {
                z[c] = true;
                parity ^= true;
            }
        }
        let signed = if parity { -magnitude } else { magnitude };
        rotations.push(PauliRotation::new(vec![false; n], z, signed));
    }
    Ok((pre, rotations, post))
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsynth_ir::QubitId;

    #[test]
    fn test_clifford_only_circuit_is_single_block() {
        let mut circuit = QCir::with_size("clif", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let tab = qc_to_tableau(&circuit).unwrap();
        assert_eq!(tab.blocks.len(), 1);
        assert!(matches!(tab.blocks[0], TableauBlock::Clifford(_)));
    }

    #[test]
    fn test_single_t_gate_produces_one_rotation() {
        let mut circuit = QCir::with_size("t", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        let tab = qc_to_tableau(&circuit).unwrap();
        let rotations = tab.flatten_rotations();
        assert_eq!(rotations.len(), 1);
        assert_eq!(rotations[0].phase(), Phase::new(1, 4));
    }

    #[test]
    fn test_mixed_circuit_interleaves_blocks() {
        let mut circuit = QCir::with_size("mixed", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.t(QubitId(1)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let tab = qc_to_tableau(&circuit).unwrap();
        assert_eq!(tab.blocks.len(), 3);
        assert!(matches!(tab.blocks[0], TableauBlock::Clifford(_)));
        assert!(matches!(tab.blocks[1], TableauBlock::Rotations(_)));
        assert!(matches!(tab.blocks[2], TableauBlock::Clifford(_)));
    }
}
