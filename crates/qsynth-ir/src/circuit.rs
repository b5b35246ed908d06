//! High-level circuit builder API: [`QCir`], the gate-list representation
//! of a quantum circuit.

use qsynth_core::Phase;

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::Operation;
use crate::instruction::Instruction;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit built from the closed [`Operation`] catalog.
///
/// This provides a high-level API for building circuits, with convenient
/// methods for common gates and operations, backed by a [`CircuitDag`] for
/// topological iteration and in-place rewriting.
pub struct QCir {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
    /// Counter for generating classical bit IDs.
    next_clbit_id: u32,
}

impl QCir {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single qubit to the circuit, returning its id.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        let qubit = Qubit::new(id);
        self.qubits.push(qubit);
        self.dag.add_qubit(id);
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = QubitId(self.next_qubit_id);
            self.next_qubit_id += 1;
            let qubit = Qubit::with_register(id, &name, i);
            self.qubits.push(qubit);
            self.dag.add_qubit(id);
            ids.push(id);
        }
        ids
    }

    /// Insert a fresh qubit at the end of the register, returning its id.
    ///
    /// Existing qubit ids and the instructions that reference them are
    /// unaffected — the new qubit carries no wire history.
    pub fn insert_qubit(&mut self) -> QubitId {
        self.add_qubit()
    }

    /// Remove an idle qubit (one with no operations on its wire) from the
    /// circuit.
    ///
    /// Returns an error if the qubit does not exist or still has
    /// operations attached to it.
    pub fn remove_qubit(&mut self, qubit: QubitId) -> IrResult<()> {
        self.dag.remove_qubit(qubit)?;
        self.qubits.retain(|q| q.id != qubit);
        Ok(())
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        let clbit = Clbit::new(id);
        self.clbits.push(clbit);
        self.dag.add_clbit(id);
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let mut ids = vec![];
        for i in 0..size {
            let id = ClbitId(self.next_clbit_id);
            self.next_clbit_id += 1;
            let clbit = Clbit::with_register(id, &name, i);
            self.clbits.push(clbit);
            self.dag.add_clbit(id);
            ids.push(id);
        }
        ids
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::single_qubit_gate(Operation::H, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::x(), qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::y(), qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::z(), qubit))?;
        Ok(self)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::s(), qubit))?;
        Ok(self)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::sdg(), qubit))?;
        Ok(self)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::t(), qubit))?;
        Ok(self)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::tdg(), qubit))?;
        Ok(self)
    }

    /// Apply sqrt(X) gate.
    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::sx(), qubit))?;
        Ok(self)
    }

    /// Apply sqrt(X)-dagger gate.
    pub fn sxdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::sxdg(), qubit))?;
        Ok(self)
    }

    /// Apply a Z-axis rotation by `phase` (the `Pz` family: `phase = π`
    /// recovers `Z`, `π/2` recovers `S`, `π/4` recovers `T`).
    pub fn pz(&mut self, phase: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::Pz(phase), qubit))?;
        Ok(self)
    }

    /// Apply an X-axis phase rotation (the `Px` family).
    pub fn px(&mut self, phase: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::Px(phase), qubit))?;
        Ok(self)
    }

    /// Apply a Y-axis phase rotation (the `Py` family).
    pub fn py(&mut self, phase: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::Py(phase), qubit))?;
        Ok(self)
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::Rx(theta), qubit))?;
        Ok(self)
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::Ry(theta), qubit))?;
        Ok(self)
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::single_qubit_gate(Operation::Rz(theta), qubit))?;
        Ok(self)
    }

    /// Apply the universal single-qubit gate `U(θ, φ, λ)`.
    pub fn u(&mut self, theta: Phase, phi: Phase, lambda: Phase, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::single_qubit_gate(
            Operation::U(theta, phi, lambda),
            qubit,
        ))?;
        Ok(self)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(Operation::cx(), control, target))?;
        Ok(self)
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(Operation::cy(), control, target))?;
        Ok(self)
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(Operation::cz(), control, target))?;
        Ok(self)
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(Operation::Swap, q1, q2))?;
        Ok(self)
    }

    /// Apply the echoed cross-resonance (`ECR`) gate.
    pub fn ecr(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::two_qubit_gate(Operation::Ecr, q1, q2))?;
        Ok(self)
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(Operation::ccx(), [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply doubly-controlled-Z (CCZ) gate.
    pub fn ccz(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(Operation::ccz(), [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply an arbitrary operation to `qubits`, in operand order.
    pub fn apply(&mut self, op: Operation, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(op, qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure all qubits to corresponding classical bits.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.clbits.len() < self.qubits.len() {
            self.add_clbit();
        }

        let qubits: Vec<_> = self.qubits.iter().map(|q| q.id).collect();
        let clbits: Vec<_> = self
            .clbits
            .iter()
            .map(|c| c.id)
            .take(qubits.len())
            .collect();

        self.dag.apply(Instruction::measure_all(qubits, clbits))?;
        Ok(self)
    }

    // =========================================================================
    // Composition
    // =========================================================================

    /// Compose `other` onto the end of this circuit, mapping `other`'s
    /// qubits onto `qubit_map` (same length and order as `other.qubits()`).
    ///
    /// Classical bits are mapped positionally: `other`'s `i`-th classical
    /// bit is mapped onto this circuit's `i`-th classical bit, extending
    /// this circuit with fresh classical bits as needed.
    pub fn compose(&mut self, other: &QCir, qubit_map: &[QubitId]) -> IrResult<&mut Self> {
        if qubit_map.len() != other.num_qubits() {
            return Err(crate::error::IrError::InvalidDag(format!(
                "compose: qubit_map has {} entries but `other` has {} qubits",
                qubit_map.len(),
                other.num_qubits()
            )));
        }

        while self.clbits.len() < other.clbits.len() {
            self.add_clbit();
        }
        let clbit_map: Vec<ClbitId> = self.clbits.iter().take(other.clbits.len()).map(|c| c.id).collect();

        for (_, inst) in other.dag.topological_ops() {
            let mapped_qubits: Vec<QubitId> = inst
                .qubits
                .iter()
                .map(|q| qubit_map[q.0 as usize])
                .collect();
            let mapped_clbits: Vec<ClbitId> = inst
                .clbits
                .iter()
                .map(|c| clbit_map[c.0 as usize])
                .collect();
            self.dag.apply(Instruction {
                op: inst.op.clone(),
                qubits: mapped_qubits,
                clbits: mapped_clbits,
            })?;
        }

        self.dag.add_global_phase(other.dag.global_phase());
        Ok(self)
    }

    /// Append `other` as a disjoint block on fresh qubits, returning the
    /// combined circuit. Neither circuit is mutated.
    pub fn tensor_product(&self, other: &QCir) -> IrResult<QCir> {
        let mut result = QCir::with_size(
            format!("{}⊗{}", self.name, other.name),
            self.num_qubits() as u32,
            self.num_clbits() as u32,
        );
        let self_map: Vec<QubitId> = (0..self.num_qubits() as u32).map(QubitId).collect();
        result.compose(self, &self_map)?;

        let other_qubit_map: Vec<QubitId> = (0..other.num_qubits() as u32)
            .map(|_| result.add_qubit())
            .collect();
        result.compose(other, &other_qubit_map)?;

        Ok(result)
    }

    /// Reverse instruction order and replace every operation with its
    /// adjoint, turning this circuit into its own inverse in place.
    ///
    /// The global phase is negated along with every gate.
    pub fn adjoint_inplace(&mut self) -> IrResult<&mut Self> {
        let ops: Vec<Instruction> = self
            .dag
            .topological_ops()
            .map(|(_, inst)| inst.clone())
            .collect();
        let global_phase = self.dag.global_phase();

        let mut rebuilt = CircuitDag::new();
        for qubit in self.dag.qubits() {
            rebuilt.add_qubit(qubit);
        }
        for clbit in self.dag.clbits() {
            rebuilt.add_clbit(clbit);
        }
        rebuilt.set_level(self.dag.level());
        rebuilt.set_global_phase(-global_phase);

        for inst in ops.into_iter().rev() {
            rebuilt.apply(Instruction {
                op: inst.op.adjoint(),
                qubits: inst.qubits,
                clbits: inst.clbits,
            })?;
        }

        self.dag = rebuilt;
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Get a mutable reference to the underlying DAG.
    pub fn dag_mut(&mut self) -> &mut CircuitDag {
        &mut self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Create a circuit from a DAG.
    pub fn from_dag(dag: CircuitDag) -> Self {
        let num_qubits = dag.num_qubits() as u32;
        let num_clbits = dag.num_clbits() as u32;

        let qubits: Vec<_> = dag.qubits().map(Qubit::new).collect();
        let clbits: Vec<_> = dag.clbits().map(Clbit::new).collect();

        Self {
            name: "circuit".into(),
            qubits,
            clbits,
            dag,
            next_qubit_id: num_qubits,
            next_clbit_id: num_clbits,
        }
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        let q0 = QubitId(0);
        let q1 = QubitId(1);
        let c0 = ClbitId(0);
        let c1 = ClbitId(1);

        circuit.h(q0)?.cx(q0, q1)?.measure(q0, c0)?.measure(q1, c1)?;

        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new("ghz_0"));
        }

        let mut circuit = Self::with_size("ghz", n, n);

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        for i in 0..n {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }

        Ok(circuit)
    }
}

impl Clone for QCir {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            dag: self.dag.clone(),
            next_qubit_id: self.next_qubit_id,
            next_clbit_id: self.next_clbit_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = QCir::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
    }

    #[test]
    fn test_circuit_with_size() {
        let circuit = QCir::with_size("test", 3, 2);
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_clbits(), 2);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = QCir::new("test");
        let qreg = circuit.add_qreg("q", 4);
        let creg = circuit.add_creg("c", 4);

        assert_eq!(qreg.len(), 4);
        assert_eq!(creg.len(), 4);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_clbits(), 4);
    }

    #[test]
    fn test_bell_state() {
        let circuit = QCir::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_ghz_state() {
        let circuit = QCir::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 5);
    }

    #[test]
    fn test_parameterized_gate() {
        let mut circuit = QCir::with_size("test", 1, 0);
        circuit.rx(Phase::new(1, 2), QubitId(0)).unwrap();
        circuit.ry(Phase::new(1, 4), QubitId(0)).unwrap();

        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = QCir::with_size("test", 2, 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
    }

    #[test]
    fn test_tensor_product() {
        let mut a = QCir::with_size("a", 1, 0);
        a.h(QubitId(0)).unwrap();
        let mut b = QCir::with_size("b", 1, 0);
        b.x(QubitId(0)).unwrap();

        let combined = a.tensor_product(&b).unwrap();
        assert_eq!(combined.num_qubits(), 2);
        assert_eq!(combined.depth(), 1);
    }

    #[test]
    fn test_adjoint_inplace_reverses_and_inverts() {
        let mut circuit = QCir::with_size("test", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        circuit.s(QubitId(0)).unwrap();

        circuit.adjoint_inplace().unwrap();

        let ops: Vec<_> = circuit.dag().topological_ops().map(|(_, i)| i.op.clone()).collect();
        assert_eq!(ops, vec![Operation::sdg(), Operation::tdg()]);
    }

    #[test]
    fn test_compose_maps_qubits() {
        let mut block = QCir::with_size("block", 2, 0);
        block.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();

        let mut target = QCir::with_size("target", 3, 0);
        target.compose(&block, &[QubitId(1), QubitId(2)]).unwrap();

        assert_eq!(target.depth(), 2);
    }
}
