//! Strategies for synthesizing a [`PauliRotationTableau`] into a [`QCir`]
//! (§4.I stabilizer blocks reuse [`StabilizerTableau::to_qcir`] directly;
//! this module covers §4.J, the Pauli-rotation blocks).

use qsynth_core::{Digraph, Phase};
use qsynth_ir::{Operation, QCir, QubitId};

use crate::error::TableauResult;
use crate::pauli_rotation::{extract_clifford_operators, PauliRotation};
use crate::rotation_tableau::{PauliRotationTableau, TableauBlock};
use crate::tableau::{CliffordGate, StabilizerTableau};

/// A rotation-block resynthesis strategy (§4.J).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Naive,
    Basic,
    GraySynthStar,
    GraySynthStaircase,
    Mst,
    GeneralizedMst,
}

fn append_clifford_gate(circuit: &mut QCir, g: CliffordGate) {
    let (op, qubits) = g.to_op_and_qubits();
    let qubits: Vec<QubitId> = qubits.into_iter().map(QubitId).collect();
    circuit.apply(op, qubits).expect("Clifford generators always apply cleanly");
}

fn identity_map(n: usize) -> Vec<QubitId> {
    (0..n as u32).map(QubitId).collect()
}

/// Synthesize a full [`PauliRotationTableau`] into a [`QCir`], composing
/// each Clifford block via [`StabilizerTableau::to_qcir`] and each rotation
/// block via `strategy`.
pub fn synthesize(tableau: &PauliRotationTableau, strategy: Strategy) -> TableauResult<QCir> {
    let n = tableau.n_qubits;
    let mut circuit = QCir::with_size("resynth", n as u32, 0);
    for block in &tableau.blocks {
        let sub = match block {
            TableauBlock::Clifford(tab) => tab.to_qcir(),
            TableauBlock::Rotations(rotations) => match strategy {
                Strategy::Naive => naive(rotations, n),
                Strategy::Basic => basic(rotations, n),
                Strategy::GraySynthStar => gray_synth(rotations, n, GraySynthMode::Star)?,
                Strategy::GraySynthStaircase => gray_synth(rotations, n, GraySynthMode::Staircase)?,
                Strategy::Mst => mst(rotations, n)?,
                Strategy::GeneralizedMst => generalized_mst(rotations, n),
            },
        };
        circuit
            .compose(&sub, &identity_map(n))
            .expect("blocks are always composed over the same qubit count");
    }
    Ok(circuit)
}

/// For each rotation: conjugate to `Z` on a single target, emit the phase,
/// then undo the conjugation. No residual Clifford accumulates.
fn naive(rotations: &[PauliRotation], n: usize) -> QCir {
    let mut circuit = QCir::with_size("naive", n as u32, 0);
    for r in rotations {
        if r.is_identity() {
            continue;
        }
        let Some((log, target)) = extract_clifford_operators(r) else {
            continue;
        };
        for g in &log {
            append_clifford_gate(&mut circuit, *g);
        }
        circuit.pz(r.phase(), QubitId(target as u32)).unwrap();
        for g in log.iter().rev() {
            append_clifford_gate(&mut circuit, g.adjoint());
        }
    }
    circuit
}

/// Like [`naive`], but the per-rotation conjugation is never undone inline;
/// its adjoint is deferred and emitted once at the end as the collapsed
/// residual Clifford.
fn basic(rotations: &[PauliRotation], n: usize) -> QCir {
    let mut circuit = QCir::with_size("basic", n as u32, 0);
    let mut residual_log: Vec<CliffordGate> = Vec::new();
    for r in rotations {
        if r.is_identity() {
            continue;
        }
        let Some((log, target)) = extract_clifford_operators(r) else {
            continue;
        };
        for g in &log {
            append_clifford_gate(&mut circuit, *g);
        }
        circuit.pz(r.phase(), QubitId(target as u32)).unwrap();
        residual_log.extend(log);
    }
    for g in residual_log.into_iter().rev() {
        append_clifford_gate(&mut circuit, g.adjoint());
    }
    circuit
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GraySynthMode {
    Star,
    Staircase,
}

/// A working (mutable) copy of a rotation during Gray-code-tree synthesis.
struct WorkingRotation {
    rotation: PauliRotation,
}

fn gray_synth(rotations: &[PauliRotation], n: usize, mode: GraySynthMode) -> TableauResult<QCir> {
    for r in rotations {
        if !r.is_diagonal() {
            return Err(crate::error::TableauError::Unsupported(
                "GraySynth requires diagonal rotations".to_string(),
            ));
        }
    }
    let mut circuit = QCir::with_size("gray_synth", n as u32, 0);
    let mut working: Vec<WorkingRotation> = rotations
        .iter()
        .cloned()
        .map(|rotation| WorkingRotation { rotation })
        .collect();
    let all_rows: Vec<usize> = (0..working.len()).collect();
    let all_qubits: Vec<usize> = (0..n).collect();
    gray_synth_recurse(&mut working, &all_rows, &all_qubits, None, &mut circuit, mode);
    Ok(circuit)
}

fn gray_synth_recurse(
    working: &mut [WorkingRotation],
    r: &[usize],
    q: &[usize],
    target: Option<usize>,
    circuit: &mut QCir,
    mode: GraySynthMode,
) {
    // Resolve CX gates for the current target: qubits with z=1 across every
    // rotation in `r`, other than the target itself.
    if let Some(t) = target {
        let controls: Vec<usize> = q
            .iter()
            .copied()
            .filter(|&i| i != t && r.iter().all(|&idx| working[idx].rotation.z_bit(i)))
            .collect();
        match mode {
            GraySynthMode::Star => {
                for &c in &controls {
                    emit_cx_and_conjugate(working, r, c, t, circuit);
                }
            }
            GraySynthMode::Staircase => {
                let mut chain = controls.clone();
                chain.push(t);
                for pair in chain.windows(2) {
                    emit_cx_and_conjugate(working, r, pair[0], pair[1], circuit);
                }
            }
        }
    }

    if q.is_empty() || r.is_empty() {
        if let Some(t) = target {
            for &idx in r {
                let phase = working[idx].rotation.phase();
                if !phase.is_zero() {
                    circuit.pz(phase, QubitId(t as u32)).unwrap();
                }
            }
        }
        return;
    }

    // Choose a cofactor column: whichever of "max ones" / "max zeros" in the
    // z-column (restricted to `r`) is larger.
    let q_star = *q
        .iter()
        .max_by_key(|&&col| {
            let ones = r.iter().filter(|&&idx| working[idx].rotation.z_bit(col)).count();
            ones.max(r.len() - ones)
        })
        .expect("q is non-empty here");

    let (r0, r1): (Vec<usize>, Vec<usize>) = r
        .iter()
        .copied()
        .partition(|&idx| !working[idx].rotation.z_bit(q_star));
    let rest_q: Vec<usize> = q.iter().copied().filter(|&c| c != q_star).collect();

    gray_synth_recurse(working, &r0, &rest_q, target, circuit, mode);
    let next_target = target.or(Some(q_star));
    gray_synth_recurse(working, &r1, &rest_q, next_target, circuit, mode);
}

fn emit_cx_and_conjugate(working: &mut [WorkingRotation], r: &[usize], c: usize, t: usize, circuit: &mut QCir) {
    circuit.cx(QubitId(c as u32), QubitId(t as u32)).unwrap();
    for &idx in r {
        working[idx].rotation.cx(c, t);
    }
}

/// Diagonal-only strategy that repeatedly collapses the lowest-weight
/// rotation's support onto a single root via a CX arborescence.
fn mst(rotations: &[PauliRotation], n: usize) -> TableauResult<QCir> {
    for r in rotations {
        if !r.is_diagonal() {
            return Err(crate::error::TableauError::Unsupported(
                "MST resynthesis requires diagonal rotations".to_string(),
            ));
        }
    }
    let mut circuit = QCir::with_size("mst", n as u32, 0);
    let mut remaining: Vec<PauliRotation> = rotations.to_vec();

    while !remaining.is_empty() {
        let (pick_idx, _) = remaining
            .iter()
            .enumerate()
            .min_by_key(|(_, r)| r.support().len())
            .expect("remaining is non-empty");
        let picked = remaining.remove(pick_idx);
        let support = picked.support();
        if support.is_empty() {
            // A pure global phase with no support has nowhere to land.
            continue;
        }
        if support.len() == 1 {
            circuit.pz(picked.phase(), QubitId(support[0] as u32)).unwrap();
            continue;
        }

        let mut graph: Digraph<usize, i64> = Digraph::new();
        let mut vertex_of = std::collections::HashMap::new();
        for &q in &support {
            let v = graph.add_vertex(q);
            vertex_of.insert(q, v);
        }
        for &i in &support {
            for &j in &support {
                if i == j {
                    continue;
                }
                let differ = remaining.iter().filter(|r| r.z_bit(i) != r.z_bit(j)).count() as i64;
                // remaining.len(): z[j] is boolean, so every rotation counts
                // toward "z[j] in {0,1}".
                let weight = differ - remaining.len() as i64 - 1;
                graph.add_edge(vertex_of[&i], vertex_of[&j], weight);
            }
        }
        let root_q = support[0];
        let (arborescence, _) = qsynth_core::minimum_spanning_arborescence_any_root(&graph)
            .unwrap_or_else(|| (qsynth_core::minimum_spanning_arborescence(&graph, vertex_of[&root_q]), vertex_of[&root_q]));
        let order = post_order_from_root(&arborescence);
        for v in order {
            if let Some((parent_v, _)) = arborescence.in_edges(v).next() {
                let c = *graph.vertex_attr(v);
                let t = *graph.vertex_attr(parent_v);
                circuit.cx(QubitId(c as u32), QubitId(t as u32)).unwrap();
                for rem in remaining.iter_mut() {
                    rem.cx(c, t);
                }
            }
        }
        let collapsed = support
            .iter()
            .copied()
            .find(|&q| arborescence.in_edges(vertex_of[&q]).next().is_none())
            .unwrap_or(root_q);
        circuit.pz(picked.phase(), QubitId(collapsed as u32)).unwrap();
    }
    Ok(circuit)
}

fn post_order_from_root<V: Clone, E>(g: &Digraph<V, E>) -> Vec<qsynth_core::Vertex> {
    let roots: Vec<_> = g.vertices().filter(|&v| g.in_edges(v).next().is_none()).collect();
    let mut order = Vec::new();
    let mut stack: Vec<_> = roots;
    let mut visited = std::collections::HashSet::new();
    while let Some(v) = stack.pop() {
        if !visited.insert(v) {
            continue;
        }
        order.push(v);
        stack.extend(g.out_neighbors(v).iter().copied());
    }
    order.reverse();
    order
}

/// As [`mst`] but allows non-diagonal rotations: each is first conjugated
/// to `Z` on its own support (recording the conjugation in the forward
/// circuit and its adjoint in the residual), then the remaining diagonal
/// problem is solved exactly as in [`mst`].
fn generalized_mst(rotations: &[PauliRotation], n: usize) -> QCir {
    let mut circuit = QCir::with_size("generalized_mst", n as u32, 0);
    let mut residual_log: Vec<CliffordGate> = Vec::new();
    let mut diagonal: Vec<PauliRotation> = Vec::with_capacity(rotations.len());
    for r in rotations {
        if r.is_identity() {
            continue;
        }
        if r.is_diagonal() {
            diagonal.push(r.clone());
            continue;
        }
        let support = r.support();
        let mut conj_log = Vec::new();
        let mut working = r.clone();
        for &q in &support {
            if working.x_bit(q) && working.z_bit(q) {
                conj_log.push(CliffordGate::S(q));
                working.s(q);
            }
            if working.x_bit(q) {
                conj_log.push(CliffordGate::H(q));
                working.h(q);
            }
        }
        for g in &conj_log {
            append_clifford_gate(&mut circuit, *g);
        }
        residual_log.extend(conj_log);
        diagonal.push(working);
    }
    if let Ok(sub) = mst(&diagonal, n) {
        circuit
            .compose(&sub, &identity_map(n))
            .expect("mst sub-circuit shares this block's qubit count");
    }
    for g in residual_log.into_iter().rev() {
        append_clifford_gate(&mut circuit, g.adjoint());
    }
    circuit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation_tableau::qc_to_tableau;
    use qsynth_ir::QubitId as Q;

    fn zzz_rotation(phase: Phase) -> PauliRotation {
        PauliRotation::new(vec![false; 3], vec![true, true, true], phase)
    }

    #[test]
    fn test_naive_single_rotation_has_conjugation_and_phase() {
        let r = zzz_rotation(Phase::new(1, 4));
        let circuit = naive(&[r], 3);
        let gates: Vec<_> = circuit.dag().topological_ops().map(|(_, i)| i.op.get_type()).collect();
        assert!(gates.contains(&"cx".to_string()));
        assert!(gates.contains(&"pz".to_string()));
    }

    #[test]
    fn test_gray_synth_star_zzz_matches_scenario() {
        let r = zzz_rotation(Phase::new(1, 4));
        let circuit = gray_synth(&[r], 3, GraySynthMode::Star).unwrap();
        let ops: Vec<_> = circuit.dag().topological_ops().map(|(_, i)| (i.op.get_type(), i.qubits.clone())).collect();
        assert_eq!(ops[0].0, "cx");
        assert!(ops.iter().any(|(t, _)| t == "pz"));
    }

    #[test]
    fn test_mst_collapses_zzz_to_single_pz() {
        let r = zzz_rotation(Phase::new(1, 4));
        let circuit = mst(&[r], 3).unwrap();
        let pz_count = circuit
            .dag()
            .topological_ops()
            .filter(|(_, i)| i.op.get_type() == "pz")
            .count();
        assert_eq!(pz_count, 1);
    }

    #[test]
    fn test_full_tableau_roundtrip_naive() {
        let mut c = QCir::with_size("t", 1, 0);
        c.t(Q(0)).unwrap();
        let tab = qc_to_tableau(&c).unwrap();
        let out = synthesize(&tab, Strategy::Naive).unwrap();
        let pz_count = out.dag().topological_ops().filter(|(_, i)| i.op.get_type() == "pz").count();
        assert_eq!(pz_count, 1);
    }
}
