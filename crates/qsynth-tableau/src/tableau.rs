//! The stabilizer tableau: a symplectic representation of a Clifford group
//! element acting on `n` qubits.
//!
//! Rows `0..n` are destabilizer generators, rows `n..2n` are stabilizer
//! generators; each row carries an `x`-part and a `z`-part of `n` bits plus
//! a sign bit. Starting from the identity tableau, appending `h`/`s`/`cx`
//! conjugates every row in place; `extract_clifford_operators` runs that
//! process in reverse to recover a circuit for an arbitrary tableau.

use qsynth_core::Phase;
use qsynth_ir::{Operation, QCir, QubitId};

use crate::error::{TableauError, TableauResult};

/// One Clifford generator in an emission log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliffordGate {
    H(usize),
    S(usize),
    Sdg(usize),
    Cx(usize, usize),
    X(usize),
    Z(usize),
}

impl CliffordGate {
    pub(crate) fn adjoint(self) -> CliffordGate {
        match self {
            CliffordGate::S(q) => CliffordGate::Sdg(q),
            CliffordGate::Sdg(q) => CliffordGate::S(q),
            other => other,
        }
    }

    pub(crate) fn to_op_and_qubits(self) -> (Operation, Vec<usize>) {
        match self {
            CliffordGate::H(q) => (Operation::H, vec![q]),
            CliffordGate::S(q) => (Operation::s(), vec![q]),
            CliffordGate::Sdg(q) => (Operation::sdg(), vec![q]),
            CliffordGate::Cx(c, t) => (Operation::cx(), vec![c, t]),
            CliffordGate::X(q) => (Operation::x(), vec![q]),
            CliffordGate::Z(q) => (Operation::z(), vec![q]),
        }
    }
}

/// A stabilizer tableau over `n` qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilizerTableau {
    n: usize,
    x: Vec<Vec<bool>>,
    z: Vec<Vec<bool>>,
    signs: Vec<bool>,
}

impl StabilizerTableau {
    /// The identity tableau on `n` qubits: destabilizer `i` is `X_i`,
    /// stabilizer `i` is `Z_i`.
    pub fn identity(n: usize) -> Self {
        let mut x = vec![vec![false; n]; 2 * n];
        let mut z = vec![vec![false; n]; 2 * n];
        for i in 0..n {
            x[i][i] = true;
            z[n + i][i] = true;
        }
        StabilizerTableau {
            n,
            x,
            z,
            signs: vec![false; 2 * n],
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.n
    }

    pub fn sign(&self, row: usize) -> bool {
        self.signs[row]
    }

    pub fn x_bit(&self, row: usize, col: usize) -> bool {
        self.x[row][col]
    }

    pub fn z_bit(&self, row: usize, col: usize) -> bool {
        self.z[row][col]
    }

    fn check_qubit(&self, q: usize) -> TableauResult<()> {
        if q >= self.n {
            Err(TableauError::InvalidInput(format!(
                "qubit {q} out of range for {}-qubit tableau",
                self.n
            )))
        } else {
            Ok(())
        }
    }

    // --- append-style Clifford generators ---

    pub fn h(&mut self, q: usize) {
        for r in 0..2 * self.n {
            self.signs[r] ^= self.x[r][q] && self.z[r][q];
            std::mem::swap(&mut self.x[r][q], &mut self.z[r][q]);
        }
    }

    pub fn s(&mut self, q: usize) {
        for r in 0..2 * self.n {
            self.signs[r] ^= self.x[r][q] && self.z[r][q];
            self.z[r][q] ^= self.x[r][q];
        }
    }

    pub fn cx(&mut self, c: usize, t: usize) {
        for r in 0..2 * self.n {
            let (xc, xt, zc, zt) = (self.x[r][c], self.x[r][t], self.z[r][c], self.z[r][t]);
            self.signs[r] ^= xc && zt && (xt ^ zc ^ true);
            self.x[r][t] ^= xc;
            self.z[r][c] ^= zt;
        }
    }

    // --- derived generators ---

    pub fn sdg(&mut self, q: usize) {
        self.s(q);
        self.s(q);
        self.s(q);
    }

    pub fn z_gate(&mut self, q: usize) {
        self.s(q);
        self.s(q);
    }

    pub fn x_gate(&mut self, q: usize) {
        self.h(q);
        self.z_gate(q);
        self.h(q);
    }

    pub fn y_gate(&mut self, q: usize) {
        self.x_gate(q);
        self.z_gate(q);
    }

    pub fn cz(&mut self, c: usize, t: usize) {
        self.h(t);
        self.cx(c, t);
        self.h(t);
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.cx(a, b);
        self.cx(b, a);
        self.cx(a, b);
    }

    pub fn sx(&mut self, q: usize) {
        self.h(q);
        self.s(q);
        self.h(q);
    }

    pub fn sxdg(&mut self, q: usize) {
        self.h(q);
        self.sdg(q);
        self.h(q);
    }

    /// The Clifford-equivalent of the echoed cross-resonance gate, coded
    /// once here: `S(q0); SX(q1); CX(q0,q1); X(q0)`.
    pub fn ecr(&mut self, q0: usize, q1: usize) {
        self.s(q0);
        self.sx(q1);
        self.cx(q0, q1);
        self.x_gate(q0);
    }

    pub(crate) fn apply_clifford_gate(&mut self, g: CliffordGate) {
        match g {
            CliffordGate::H(q) => self.h(q),
            CliffordGate::S(q) => self.s(q),
            CliffordGate::Sdg(q) => self.sdg(q),
            CliffordGate::Cx(c, t) => self.cx(c, t),
            CliffordGate::X(q) => self.x_gate(q),
            CliffordGate::Z(q) => self.z_gate(q),
        }
    }

    /// Apply an IR [`Operation`] restricted to qubits `qubits` (in operand
    /// order) to this tableau. Returns [`TableauError::Unsupported`] for
    /// non-Clifford operations.
    pub fn apply_operation(&mut self, op: &Operation, qubits: &[usize]) -> TableauResult<()> {
        for &q in qubits {
            self.check_qubit(q)?;
        }
        match op {
            Operation::Id => {}
            Operation::H => self.h(qubits[0]),
            Operation::Ecr => self.ecr(qubits[0], qubits[1]),
            Operation::Swap => self.swap(qubits[0], qubits[1]),
            Operation::Pz(p) => self.apply_single_axis_phase(*p, qubits[0], Axis::Z)?,
            Operation::Px(p) => self.apply_single_axis_phase(*p, qubits[0], Axis::X)?,
            Operation::Py(p) => self.apply_single_axis_phase(*p, qubits[0], Axis::Y)?,
            Operation::Rz(p) | Operation::Rx(p) | Operation::Ry(p) if p.is_zero() => {}
            Operation::Rz(p) => self.apply_single_axis_phase(*p, qubits[0], Axis::Z)?,
            Operation::Rx(p) => self.apply_single_axis_phase(*p, qubits[0], Axis::X)?,
            Operation::Ry(p) => self.apply_single_axis_phase(*p, qubits[0], Axis::Y)?,
            Operation::Control { op: inner, n_ctrls } if *n_ctrls == 1 => {
                self.apply_controlled(inner, qubits[0], qubits[1])?;
            }
            other => {
                return Err(TableauError::Unsupported(format!(
                    "{} is not a Clifford generator",
                    other.get_type()
                )));
            }
        }
        Ok(())
    }

    fn apply_controlled(&mut self, inner: &Operation, c: usize, t: usize) -> TableauResult<()> {
        match inner {
            Operation::Px(p) if *p == Phase::pi() => self.cx(c, t),
            Operation::Py(p) if *p == Phase::pi() => {
                self.sdg(t);
                self.h(t);
                self.cx(c, t);
                self.h(t);
                self.s(t);
            }
            Operation::Pz(p) if *p == Phase::pi() => self.cz(c, t),
            _ => {
                return Err(TableauError::Unsupported(format!(
                    "controlled-{} is not a Clifford generator",
                    inner.get_type()
                )));
            }
        }
        Ok(())
    }

    fn apply_single_axis_phase(&mut self, p: Phase, q: usize, axis: Axis) -> TableauResult<()> {
        let pi = Phase::pi();
        let half = Phase::new(1, 2);
        let neg_half = Phase::new(-1, 2);
        if p.is_zero() {
            return Ok(());
        }
        if p == pi {
            match axis {
                Axis::X => self.x_gate(q),
                Axis::Y => self.y_gate(q),
                Axis::Z => self.z_gate(q),
            }
            return Ok(());
        }
        if p == half || p == neg_half {
            let dg = p == neg_half;
            match axis {
                Axis::Z if dg => self.sdg(q),
                Axis::Z => self.s(q),
                Axis::X if dg => self.sxdg(q),
                Axis::X => self.sx(q),
                Axis::Y if dg => {
                    self.h(q);
                    self.sdg(q);
                    self.h(q);
                }
                Axis::Y => {
                    self.h(q);
                    self.s(q);
                    self.h(q);
                }
            }
            return Ok(());
        }
        Err(TableauError::Unsupported(format!(
            "phase {p} is not a Clifford angle"
        )))
    }

    /// Aaronson–Gottesman (AG) synthesis: reduce this tableau to identity
    /// by a fixed three-phase per-qubit procedure, returning the applied
    /// generators in application order.
    pub fn extract_clifford_operators(&self) -> Vec<CliffordGate> {
        let mut tab = self.clone();
        let mut log = Vec::new();
        for q in 0..tab.n {
            tab.set_destab_x_diagonal(q, &mut log);
            tab.clear_destab_row(q, &mut log);
            tab.clear_stab_row(q, &mut log);
        }
        for q in 0..tab.n {
            if tab.signs[tab.n + q] {
                log.push(CliffordGate::X(q));
                tab.apply_clifford_gate(CliffordGate::X(q));
            }
            if tab.signs[q] {
                log.push(CliffordGate::Z(q));
                tab.apply_clifford_gate(CliffordGate::Z(q));
            }
        }
        debug_assert!(tab == StabilizerTableau::identity(tab.n), "AG synthesis failed to reduce to identity");
        log
    }

    fn set_destab_x_diagonal(&mut self, q: usize, log: &mut Vec<CliffordGate>) {
        if self.x[q][q] {
            return;
        }
        for i in q + 1..self.n {
            if self.x[q][i] {
                log.push(CliffordGate::Cx(i, q));
                self.cx(i, q);
                return;
            }
        }
        for i in q..self.n {
            if self.z[q][i] {
                log.push(CliffordGate::H(i));
                self.h(i);
                if i != q {
                    log.push(CliffordGate::Cx(i, q));
                    self.cx(i, q);
                }
                return;
            }
        }
        unreachable!("row {q} of a valid tableau's destabilizer block cannot be all-identity");
    }

    fn clear_destab_row(&mut self, q: usize, log: &mut Vec<CliffordGate>) {
        for i in q + 1..self.n {
            if self.x[q][i] {
                log.push(CliffordGate::Cx(q, i));
                self.cx(q, i);
            }
        }
        if (q..self.n).any(|i| self.z[q][i]) {
            if !self.z[q][q] {
                log.push(CliffordGate::S(q));
                self.s(q);
            }
            for i in q + 1..self.n {
                if self.z[q][i] {
                    log.push(CliffordGate::Cx(i, q));
                    self.cx(i, q);
                }
            }
            log.push(CliffordGate::S(q));
            self.s(q);
        }
    }

    fn clear_stab_row(&mut self, q: usize, log: &mut Vec<CliffordGate>) {
        let row = self.n + q;
        if (q..self.n).any(|i| self.x[row][i]) {
            log.push(CliffordGate::H(q));
            self.h(q);
            for i in q + 1..self.n {
                if self.x[row][i] {
                    log.push(CliffordGate::Cx(q, i));
                    self.cx(q, i);
                }
            }
            if (q..self.n).any(|i| self.z[row][i]) {
                if !self.z[row][q] {
                    log.push(CliffordGate::S(q));
                    self.s(q);
                }
                for i in q + 1..self.n {
                    if self.z[row][i] {
                        log.push(CliffordGate::Cx(i, q));
                        self.cx(i, q);
                    }
                }
                log.push(CliffordGate::S(q));
                self.s(q);
            }
            log.push(CliffordGate::H(q));
            self.h(q);
        }
    }

    /// Synthesize a [`QCir`] over `n` qubits implementing this tableau,
    /// using only `H`, `S`, `CX` (and their derived `Sdg`/`X`/`Z`). The
    /// circuit is the adjoint of the reduction-to-identity emission.
    pub fn to_qcir(&self) -> QCir {
        let log = self.extract_clifford_operators();
        let mut circuit = QCir::with_size("tableau", self.n, 0);
        for gate in log.into_iter().rev() {
            let (op, qubits) = gate.adjoint().to_op_and_qubits();
            let qubits: Vec<QubitId> = qubits.into_iter().map(QubitId).collect();
            circuit.apply(op, qubits).expect("Clifford generators always apply cleanly");
        }
        circuit
    }

    /// Translate a Clifford-only [`QCir`] into its tableau, applying each
    /// instruction in topological order to the identity tableau.
    pub fn from_qcir(circuit: &QCir) -> TableauResult<Self> {
        let mut tab = StabilizerTableau::identity(circuit.num_qubits());
        for (_, instr) in circuit.dag().topological_ops() {
            if !instr.op.is_clifford() {
                return Err(TableauError::Unsupported(format!(
                    "{} is not Clifford",
                    instr.op.get_type()
                )));
            }
            let qubits: Vec<usize> = instr.qubits.iter().map(|q| q.0).collect();
            tab.apply_operation(&instr.op, &qubits)?;
        }
        Ok(tab)
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_round_trips() {
        let tab = StabilizerTableau::identity(3);
        assert_eq!(tab.extract_clifford_operators().len(), 0);
    }

    #[test]
    fn test_h_is_involution_on_tableau() {
        let mut tab = StabilizerTableau::identity(1);
        tab.h(0);
        tab.h(0);
        assert_eq!(tab, StabilizerTableau::identity(1));
    }

    #[test]
    fn test_cx_from_bell_circuit_round_trips() {
        let mut circuit = QCir::with_size("bell", 2, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let tab = StabilizerTableau::from_qcir(&circuit).unwrap();
        let synthesized = tab.to_qcir();
        let tab2 = StabilizerTableau::from_qcir(&synthesized).unwrap();
        assert_eq!(tab, tab2);
    }

    #[test]
    fn test_non_clifford_rejected() {
        let mut circuit = QCir::with_size("t_gate", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        assert!(StabilizerTableau::from_qcir(&circuit).is_err());
    }

    #[test]
    fn test_s_s_s_s_is_identity() {
        let mut tab = StabilizerTableau::identity(1);
        for _ in 0..4 {
            tab.s(0);
        }
        assert_eq!(tab, StabilizerTableau::identity(1));
    }

    #[test]
    fn test_ag_synthesis_reduces_ghz_to_identity() {
        let mut circuit = QCir::with_size("ghz", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit.cx(QubitId(1), QubitId(2)).unwrap();
        let tab = StabilizerTableau::from_qcir(&circuit).unwrap();
        let log = tab.extract_clifford_operators();
        let mut reduced = tab.clone();
        for g in log {
            reduced.apply_clifford_gate(g);
        }
        assert_eq!(reduced, StabilizerTableau::identity(3));
    }
}
