//! Forward/backward gate-list optimizer: Hadamard/CX/CZ cancellation, Pauli
//! frame propagation, and Z-rotation fusion.
//!
//! The pass keeps, per qubit, a pending Pauli frame `(h, x, z)` instead of
//! emitting `H`/`X`/`Z` immediately; gates compatible with the frame get
//! absorbed into it (Paulis cancel, CX/CZ push a pending `X` or `Z` across
//! to the other qubit) and everything else forces a flush. This mirrors how
//! a stabilizer-frame tracker works, specialized to a single forward or
//! backward sweep over the gate list.
//!
//! `Swap` is never emitted as a gate mid-sweep. Instead each sweep carries a
//! qubit-permutation map: a swap just relabels which tracked wire the raw
//! positions resolve to, so gates on either side of a swap still cancel and
//! fuse through it. The accumulated permutation is rendered back as a swap
//! path at the end of the sweep, one swap per transposition in its cycle
//! decomposition, each swap as three CX.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use qsynth_core::Phase;
use qsynth_ir::{CircuitDag, Instruction, Operation, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Forward/backward peephole optimizer (spec component L).
pub struct BasicOptimizer {
    /// Upper bound on backward/forward alternations after the initial
    /// forward–backward–forward warm-up.
    pub max_iter: usize,
    /// Polled between driver iterations; long-running loops must be able
    /// to report cancellation rather than run unbounded.
    pub stop_requested: Option<Arc<dyn Fn() -> bool + Send + Sync>>,
}

impl Default for BasicOptimizer {
    fn default() -> Self {
        Self {
            max_iter: 8,
            stop_requested: None,
        }
    }
}

impl Pass for BasicOptimizer {
    fn name(&self) -> &'static str {
        "BasicOptimizer"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let instrs: Vec<Instruction> = dag.topological_ops().map(|(_, i)| i.clone()).collect();
        let optimized = self.drive(instrs)?;

        let mut new_dag = CircuitDag::new();
        for qubit in dag.qubits().collect::<Vec<_>>() {
            new_dag.add_qubit(qubit);
        }
        for clbit in dag.clbits().collect::<Vec<_>>() {
            new_dag.add_clbit(clbit);
        }
        new_dag.set_global_phase(dag.global_phase());
        new_dag.set_level(dag.level());
        for inst in optimized {
            new_dag.apply(inst)?;
        }
        *dag = new_dag;
        Ok(())
    }
}

impl BasicOptimizer {
    fn drive(&self, instrs: Vec<Instruction>) -> CompileResult<Vec<Instruction>> {
        let mut cur = forward_pass(&instrs, false);
        cur = backward_pass(&cur, false);
        cur = forward_pass(&cur, false);
        let mut stats = Stats::of(&cur);

        for _ in 0..self.max_iter {
            if self.stop_requested.as_ref().is_some_and(|f| f()) {
                return Err(CompileError::Interrupted);
            }
            let next = forward_pass(&backward_pass(&cur, true), true);
            let next_stats = Stats::of(&next);
            if !next_stats.strictly_better_than(&stats) {
                break;
            }
            cur = next;
            stats = next_stats;
        }

        Ok(cur)
    }
}

/// `(twoq, h, non_pauli)` gate-count statistics the driver minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stats {
    twoq: usize,
    h: usize,
    non_pauli: usize,
}

impl Stats {
    fn of(instrs: &[Instruction]) -> Self {
        let mut s = Stats { twoq: 0, h: 0, non_pauli: 0 };
        for inst in instrs {
            match &inst.op {
                Operation::H => s.h += 1,
                Operation::Id => {}
                Operation::Px(p) | Operation::Pz(p) | Operation::Py(p) if *p == Phase::pi() => {}
                Operation::Control { n_ctrls, .. } if *n_ctrls == 1 => s.twoq += 1,
                _ => s.non_pauli += 1,
            }
        }
        s
    }

    fn total(&self) -> usize {
        self.twoq + self.h + self.non_pauli
    }

    fn strictly_better_than(&self, other: &Stats) -> bool {
        self.total() < other.total()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    h: bool,
    x: bool,
    z: bool,
}

struct Sweep {
    frame: FxHashMap<QubitId, Frame>,
    out: Vec<Instruction>,
    /// Index of the last emitted Z-rotation on a qubit, for fusion.
    avail_z: FxHashMap<QubitId, usize>,
    /// Index of the last emitted two-qubit gate on a normalized pair, and
    /// whether it was a CX (`true`) or a CZ (`false`).
    avail_2q: FxHashMap<(QubitId, QubitId), (usize, bool)>,
    /// Raw wire -> tracked wire, accumulated across swaps seen so far.
    perm: FxHashMap<QubitId, QubitId>,
    cz_minimize: bool,
}

fn pair(a: QubitId, b: QubitId) -> (QubitId, QubitId) {
    if a.0 <= b.0 { (a, b) } else { (b, a) }
}

impl Sweep {
    fn new(cz_minimize: bool) -> Self {
        Sweep {
            frame: FxHashMap::default(),
            out: Vec::new(),
            avail_z: FxHashMap::default(),
            avail_2q: FxHashMap::default(),
            perm: FxHashMap::default(),
            cz_minimize,
        }
    }

    /// Current tracked wire a raw instruction-stream position resolves to.
    fn resolve(&self, q: QubitId) -> QubitId {
        *self.perm.get(&q).unwrap_or(&q)
    }

    /// Fold a swap into the permutation instead of emitting a gate: future
    /// references to `a` resolve to whatever `b` resolves to now, and vice
    /// versa.
    fn push_swap(&mut self, a: QubitId, b: QubitId) {
        let ra = self.resolve(a);
        let rb = self.resolve(b);
        self.perm.insert(a, rb);
        self.perm.insert(b, ra);
    }

    fn frame_of(&mut self, q: QubitId) -> Frame {
        *self.frame.entry(q).or_default()
    }

    fn invalidate(&mut self, q: QubitId) {
        self.avail_z.remove(&q);
        self.avail_2q.retain(|&(a, b), _| a != q && b != q);
    }

    fn flush_h(&mut self, q: QubitId) {
        let mut f = self.frame_of(q);
        if f.h {
            self.out.push(Instruction::single_qubit_gate(Operation::H, q));
            f.h = false;
            self.frame.insert(q, f);
            self.invalidate(q);
        }
    }

    fn flush_all(&mut self, q: QubitId) {
        let f = self.frame_of(q);
        if f.z {
            self.out
                .push(Instruction::single_qubit_gate(Operation::Pz(Phase::pi()), q));
        }
        if f.x {
            self.out
                .push(Instruction::single_qubit_gate(Operation::Px(Phase::pi()), q));
        }
        if f.h {
            self.out.push(Instruction::single_qubit_gate(Operation::H, q));
        }
        self.frame.insert(q, Frame::default());
        self.invalidate(q);
    }

    fn push_h(&mut self, q: QubitId) {
        let mut f = self.frame_of(q);
        if f.z && !f.x {
            f.z = false;
            f.x = true;
        } else if f.x && !f.z {
            f.x = false;
            f.z = true;
        } else {
            f.h = !f.h;
        }
        self.frame.insert(q, f);
        self.invalidate(q);
    }

    fn push_x(&mut self, q: QubitId) {
        let mut f = self.frame_of(q);
        f.x = !f.x;
        self.frame.insert(q, f);
    }

    fn push_z_rotation(&mut self, q: QubitId, phase: Phase) {
        let mut f = self.frame_of(q);
        let mut phi = phase;
        if f.z {
            phi = phi + Phase::pi();
            f.z = false;
        }
        if phi.is_zero() {
            self.frame.insert(q, f);
            return;
        }
        if f.x {
            phi = -phi;
        }
        if phi == Phase::pi() {
            f.z = !f.z;
            self.frame.insert(q, f);
            return;
        }
        self.frame.insert(q, f);
        self.flush_h(q);

        if let Some(&idx) = self.avail_z.get(&q) {
            if let Operation::Pz(prev) = self.out[idx].op {
                let sum = prev + phi;
                if sum.is_zero() {
                    // Dead entry; leave as `Id` and drop the fusion target.
                    self.out[idx].op = Operation::Id;
                    self.avail_z.remove(&q);
                } else {
                    self.out[idx].op = Operation::Pz(sum);
                }
                return;
            }
        }

        let idx = self.out.len();
        self.out
            .push(Instruction::single_qubit_gate(Operation::Pz(phi), q));
        self.avail_z.insert(q, idx);
    }

    fn emit_cx(&mut self, ctrl: QubitId, targ: QubitId) {
        // A Z-rotation on the target does not commute through a CX; drop
        // both fusion targets rather than risk fusing across it.
        self.avail_z.remove(&ctrl);
        self.avail_z.remove(&targ);
        let key = pair(ctrl, targ);
        if let Some(&(idx, is_cx)) = self.avail_2q.get(&key) {
            if is_cx && self.instr_matches_cx(idx, ctrl, targ) {
                self.out[idx].op = Operation::Id;
                self.avail_2q.remove(&key);
                return;
            }
            if !is_cx && self.cz_minimize {
                self.rewrite_cz_then_cx(idx, key, ctrl, targ);
                return;
            }
        }
        let idx = self.out.len();
        self.out.push(Instruction::gate(Operation::cx(), [ctrl, targ]));
        self.avail_2q.insert(key, (idx, true));
    }

    fn instr_matches_cx(&self, idx: usize, ctrl: QubitId, targ: QubitId) -> bool {
        self.out[idx].qubits == [ctrl, targ]
    }

    /// CZ-minimization rewrite: a CZ immediately preceded by an available
    /// CX on the same pair becomes `(S†⊗I)·CNOT·(S⊗S)`, trading the CZ
    /// away for single-qubit phase gates around the existing CNOT.
    fn rewrite_cz_then_cx(
        &mut self,
        prev_cx_idx: usize,
        key: (QubitId, QubitId),
        ctrl: QubitId,
        targ: QubitId,
    ) {
        let _ = prev_cx_idx;
        self.out
            .push(Instruction::single_qubit_gate(Operation::Pz(Phase::new(1, 2)), ctrl));
        self.out
            .push(Instruction::single_qubit_gate(Operation::Pz(Phase::new(1, 2)), targ));
        let idx = self.out.len();
        self.out.push(Instruction::gate(Operation::cx(), [ctrl, targ]));
        self.out
            .push(Instruction::single_qubit_gate(Operation::Pz(Phase::new(-1, 2)), ctrl));
        self.avail_2q.insert(key, (idx, true));
    }

    fn emit_cz(&mut self, a: QubitId, b: QubitId) {
        // Z commutes through a CZ on either wire, but clear both anyway to
        // keep the invalidation rule uniform across two-qubit gates.
        self.avail_z.remove(&a);
        self.avail_z.remove(&b);
        let key = pair(a, b);
        if let Some(&(idx, is_cx)) = self.avail_2q.get(&key) {
            if !is_cx {
                self.out[idx].op = Operation::Id;
                self.avail_2q.remove(&key);
                return;
            }
            if is_cx && self.cz_minimize {
                self.rewrite_cz_then_cx(idx, key, a, b);
                return;
            }
        }
        let idx = self.out.len();
        self.out.push(Instruction::gate(Operation::cz(), [a, b]));
        self.avail_2q.insert(key, (idx, false));
    }

    fn push_cz(&mut self, a: QubitId, b: QubitId) {
        let (fa, fb) = (self.frame_of(a), self.frame_of(b));
        if fa.x {
            let mut f = fb;
            f.z = !f.z;
            self.frame.insert(b, f);
        }
        if self.frame_of(b).x {
            let mut f = self.frame_of(a);
            f.z = !f.z;
            self.frame.insert(a, f);
        }

        let (fa, fb) = (self.frame_of(a), self.frame_of(b));
        if fa.h && fb.h {
            let mut fa = fa;
            let mut fb = fb;
            fa.h = false;
            fb.h = false;
            self.frame.insert(a, fa);
            self.frame.insert(b, fb);
        } else if !fa.h && !fb.h {
            self.emit_cz(a, b);
        } else {
            let (ctrl, targ) = if fa.h { (b, a) } else { (a, b) };
            let mut fa = self.frame_of(a);
            let mut fb = self.frame_of(b);
            fa.h = false;
            fb.h = false;
            self.frame.insert(a, fa);
            self.frame.insert(b, fb);
            self.emit_cx(ctrl, targ);
        }
    }

    fn push_cx(&mut self, a: QubitId, b: QubitId) {
        if self.frame_of(a).x {
            let mut f = self.frame_of(b);
            f.x = !f.x;
            self.frame.insert(b, f);
        }
        if self.frame_of(b).z {
            let mut f = self.frame_of(a);
            f.z = !f.z;
            self.frame.insert(a, f);
        }

        let (fa, fb) = (self.frame_of(a), self.frame_of(b));
        if fa.h && fb.h {
            let mut fa = fa;
            let mut fb = fb;
            fa.h = false;
            fb.h = false;
            self.frame.insert(a, fa);
            self.frame.insert(b, fb);
            self.emit_cx(b, a);
        } else if !fa.h && !fb.h {
            self.emit_cx(a, b);
        } else if fb.h && !fa.h {
            let mut fb = fb;
            fb.h = false;
            self.frame.insert(b, fb);
            self.emit_cz(a, b);
        } else {
            self.flush_h(a);
            self.emit_cx(a, b);
        }
    }

    fn finish(mut self) -> Vec<Instruction> {
        let qubits: Vec<QubitId> = self.frame.keys().copied().collect();
        for q in qubits {
            self.flush_all(q);
        }
        self.emit_swap_network();
        self.out.into_iter().filter(|i| i.op != Operation::Id).collect()
    }

    /// Render the accumulated permutation as a swap path: each transposition
    /// in its cycle decomposition becomes one swap, emitted as three CX.
    fn emit_swap_network(&mut self) {
        let moved: Vec<QubitId> = self.perm.keys().copied().collect();
        if moved.is_empty() {
            return;
        }

        // `inv[c] = p` reads "the tracked wire `c` must end up physically on
        // wire `p`", i.e. the inverse of `perm` restricted to `moved`.
        let mut inv: FxHashMap<QubitId, QubitId> = FxHashMap::default();
        for &p in &moved {
            let c = *self.perm.get(&p).unwrap();
            inv.insert(c, p);
        }

        let mut visited: FxHashMap<QubitId, bool> = FxHashMap::default();
        for &start in &moved {
            if *visited.get(&start).unwrap_or(&false) {
                continue;
            }
            let mut cycle = vec![start];
            visited.insert(start, true);
            let mut cur = start;
            loop {
                let next = *inv.get(&cur).unwrap_or(&cur);
                if next == start {
                    break;
                }
                visited.insert(next, true);
                cycle.push(next);
                cur = next;
            }
            for &c in &cycle[1..] {
                self.emit_swap_as_cx(cycle[0], c);
            }
        }
    }

    fn emit_swap_as_cx(&mut self, a: QubitId, b: QubitId) {
        self.out.push(Instruction::gate(Operation::cx(), [a, b]));
        self.out.push(Instruction::gate(Operation::cx(), [b, a]));
        self.out.push(Instruction::gate(Operation::cx(), [a, b]));
    }
}

fn forward_pass(instrs: &[Instruction], cz_minimize: bool) -> Vec<Instruction> {
    let mut sweep = Sweep::new(cz_minimize);
    for inst in instrs {
        let rq: Vec<QubitId> = inst.qubits.iter().map(|&q| sweep.resolve(q)).collect();
        match (&inst.op, rq.as_slice()) {
            (Operation::Swap, &[a, b]) => sweep.push_swap(a, b),
            (Operation::H, &[q]) => sweep.push_h(q),
            (Operation::Px(p), &[q]) if *p == Phase::pi() => sweep.push_x(q),
            (Operation::Pz(p) | Operation::Rz(p), &[q]) => sweep.push_z_rotation(q, *p),
            (Operation::Control { op, n_ctrls: 1 }, &[a, b]) if matches!(**op, Operation::Pz(p) if p == Phase::pi()) => {
                sweep.push_cz(a, b);
            }
            (Operation::Control { op, n_ctrls: 1 }, &[a, b]) if matches!(**op, Operation::Px(p) if p == Phase::pi()) => {
                sweep.push_cx(a, b);
            }
            _ => {
                for &q in &rq {
                    sweep.flush_all(q);
                }
                let mut resolved = inst.clone();
                resolved.qubits = rq.clone();
                sweep.out.push(resolved);
                for &q in &rq {
                    sweep.invalidate(q);
                }
            }
        }
    }
    sweep.finish()
}

fn backward_pass(instrs: &[Instruction], cz_minimize: bool) -> Vec<Instruction> {
    let mut reversed: Vec<Instruction> = instrs.iter().rev().cloned().collect();
    reversed = forward_pass(&reversed, cz_minimize);
    reversed.reverse();
    reversed
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsynth_ir::QCir;

    fn run(circuit: QCir) -> CircuitDag {
        let mut dag = circuit.into_dag();
        let mut props = PropertySet::new();
        BasicOptimizer::default().run(&mut dag, &mut props).unwrap();
        dag
    }

    #[test]
    fn test_hh_cancels() {
        let mut c = QCir::with_size("t", 1, 0);
        c.h(QubitId(0)).unwrap();
        c.h(QubitId(0)).unwrap();
        let dag = run(c);
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_cx_cx_cancels() {
        let mut c = QCir::with_size("t", 2, 0);
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        let dag = run(c);
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_t_gates_fuse_into_s() {
        let mut c = QCir::with_size("t", 1, 0);
        c.t(QubitId(0)).unwrap();
        c.t(QubitId(0)).unwrap();
        let dag = run(c);
        let ops: Vec<_> = dag.topological_ops().map(|(_, i)| i.op.clone()).collect();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0], Operation::Pz(Phase::new(1, 2)));
    }

    #[test]
    fn test_double_swap_at_most_six_cx() {
        let mut c = QCir::with_size("t", 3, 0);
        c.swap(QubitId(0), QubitId(1)).unwrap();
        c.swap(QubitId(1), QubitId(2)).unwrap();
        let dag = run(c);
        let ops: Vec<_> = dag.topological_ops().map(|(_, i)| i.op.clone()).collect();
        assert!(ops.iter().all(|op| *op != Operation::Swap));
        let cx_count = ops
            .iter()
            .filter(|op| matches!(op, Operation::Control { n_ctrls: 1, .. }))
            .count();
        assert!(cx_count <= 6);
    }

    #[test]
    fn test_swap_swap_cancels() {
        let mut c = QCir::with_size("t", 2, 0);
        c.swap(QubitId(0), QubitId(1)).unwrap();
        c.swap(QubitId(0), QubitId(1)).unwrap();
        let dag = run(c);
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_z_rotation_does_not_fuse_across_cx_target() {
        let mut c = QCir::with_size("t", 2, 0);
        let phi = Phase::new(1, 8);
        c.pz(phi, QubitId(1)).unwrap();
        c.cx(QubitId(0), QubitId(1)).unwrap();
        c.pz(phi, QubitId(1)).unwrap();
        let dag = run(c);
        let z_rotations: Vec<Phase> = dag
            .topological_ops()
            .filter_map(|(_, i)| match i.op {
                Operation::Pz(p) => Some(p),
                _ => None,
            })
            .collect();
        // Must stay as two separate rotations of `phi`, never fused into a
        // single `2*phi` rotation: `phi` on the CX target does not commute
        // with the CX.
        assert_eq!(z_rotations, vec![phi, phi]);
    }
}
