//! A single Pauli rotation `exp(-i·φ/2·P)` and its Clifford conjugation.

use qsynth_core::Phase;

/// A Pauli rotation: the Pauli string `P` (symplectic `x`/`z` bits per
/// qubit) together with its phase `φ`.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliRotation {
    x: Vec<bool>,
    z: Vec<bool>,
    phase: Phase,
}

impl PauliRotation {
    pub fn new(x: Vec<bool>, z: Vec<bool>, phase: Phase) -> Self {
        assert_eq!(x.len(), z.len(), "x/z support vectors must have equal length");
        PauliRotation { x, z, phase }
    }

    /// A single-qubit `Z` rotation on qubit `q` of an `n`-qubit register.
    pub fn single_z(n: usize, q: usize, phase: Phase) -> Self {
        let mut z = vec![false; n];
        z[q] = true;
        PauliRotation::new(vec![false; n], z, phase)
    }

    pub fn n_qubits(&self) -> usize {
        self.x.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn x_bit(&self, q: usize) -> bool {
        self.x[q]
    }

    pub fn z_bit(&self, q: usize) -> bool {
        self.z[q]
    }

    /// No `X` or `Y` positions: every qubit is `I` or `Z`.
    pub fn is_diagonal(&self) -> bool {
        self.x.iter().all(|&b| !b)
    }

    pub fn is_identity(&self) -> bool {
        self.x.iter().all(|&b| !b) && self.z.iter().all(|&b| !b)
    }

    /// Support qubits: positions where the Pauli is not `I`.
    pub fn support(&self) -> Vec<usize> {
        (0..self.n_qubits())
            .filter(|&i| self.x[i] || self.z[i])
            .collect()
    }

    // --- conjugation, formulas shared with the stabilizer tableau row
    // update; each flips `phase`'s sign exactly when the tableau's sign bit
    // would have flipped. ---

    pub fn h(&mut self, q: usize) {
        if self.x[q] && self.z[q] {
            self.phase = -self.phase;
        }
        std::mem::swap(&mut self.x[q], &mut self.z[q]);
    }

    pub fn s(&mut self, q: usize) {
        if self.x[q] && self.z[q] {
            self.phase = -self.phase;
        }
        self.z[q] ^= self.x[q];
    }

    pub fn sdg(&mut self, q: usize) {
        self.s(q);
        self.s(q);
        self.s(q);
    }

    pub fn cx(&mut self, c: usize, t: usize) {
        let (xc, xt, zc, zt) = (self.x[c], self.x[t], self.z[c], self.z[t]);
        if xc && zt && (xt ^ zc ^ true) {
            self.phase = -self.phase;
        }
        self.x[t] ^= xc;
        self.z[c] ^= zt;
    }

    /// Whether `a` and `b` commute: the symplectic inner product has even
    /// parity.
    pub fn is_commutative(a: &PauliRotation, b: &PauliRotation) -> bool {
        let mut parity = false;
        for i in 0..a.n_qubits() {
            parity ^= (a.x[i] && b.z[i]) ^ (a.z[i] && b.x[i]);
        }
        !parity
    }
}

/// Conjugations (H/S on the appropriate qubits) that reduce `rotation`'s
/// Pauli string to `Z` on a single target qubit, plus that target. Returns
/// `None` for the identity rotation (no conjugation is meaningful).
///
/// Single-qubit legs are converted to `Z` first (`H` for `X`, `S` then `H`
/// for `Y`); the remaining `Z`-only support is then collapsed onto the last
/// support qubit by a `CX` ladder.
pub fn extract_clifford_operators(rotation: &PauliRotation) -> Option<(Vec<crate::tableau::CliffordGate>, usize)> {
    use crate::tableau::CliffordGate;

    let support = rotation.support();
    let &target = support.last()?;

    let mut working = rotation.clone();
    let mut log = Vec::new();
    for &q in &support {
        if working.x[q] && working.z[q] {
            log.push(CliffordGate::S(q));
            working.s(q);
        }
        if working.x[q] {
            log.push(CliffordGate::H(q));
            working.h(q);
        }
    }
    for &q in &support {
        if q != target {
            log.push(CliffordGate::Cx(q, target));
            working.cx(q, target);
        }
    }
    Some((log, target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_z_is_diagonal() {
        let r = PauliRotation::single_z(3, 1, Phase::new(1, 4));
        assert!(r.is_diagonal());
        assert_eq!(r.support(), vec![1]);
    }

    #[test]
    fn test_h_converts_x_to_z_rotation() {
        let mut r = PauliRotation::new(vec![true], vec![false], Phase::new(1, 4));
        r.h(0);
        assert!(r.is_diagonal());
        assert!(r.z_bit(0));
    }

    #[test]
    fn test_commuting_identical_rotations() {
        let a = PauliRotation::single_z(2, 0, Phase::new(1, 4));
        let b = PauliRotation::single_z(2, 0, Phase::new(1, 2));
        assert!(PauliRotation::is_commutative(&a, &b));
    }

    #[test]
    fn test_anticommuting_x_z_same_qubit() {
        let x = PauliRotation::new(vec![true], vec![false], Phase::new(1, 4));
        let z = PauliRotation::single_z(1, 0, Phase::new(1, 4));
        assert!(!PauliRotation::is_commutative(&x, &z));
    }

    #[test]
    fn test_extract_clifford_operators_collapses_to_single_target() {
        // Z on qubits 0 and 2 of a 3-qubit rotation.
        let r = PauliRotation::new(vec![false, false, false], vec![true, false, true], Phase::new(1, 4));
        let (log, target) = extract_clifford_operators(&r).unwrap();
        assert_eq!(target, 2);
        let mut working = r.clone();
        for g in log {
            match g {
                crate::tableau::CliffordGate::H(q) => working.h(q),
                crate::tableau::CliffordGate::S(q) => working.s(q),
                crate::tableau::CliffordGate::Sdg(q) => working.sdg(q),
                crate::tableau::CliffordGate::Cx(c, t) => working.cx(c, t),
                _ => unreachable!(),
            }
        }
        assert_eq!(working.support(), vec![target]);
    }
}
