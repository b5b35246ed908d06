//! Circuit instructions combining an [`Operation`] with its operands.

use serde::{Deserialize, Serialize};

use crate::gate::{ClassicalCondition, Operation};
use crate::qubit::{ClbitId, QubitId};

/// A single instruction in a circuit: an operation applied to a fixed
/// ordering of qubits, with classical bits attached for measurement
/// targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// The operation this instruction applies.
    pub op: Operation,
    /// Qubits this instruction operates on, in gate-operand order.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes to (non-empty only for
    /// [`Operation::Measurement`]).
    pub clbits: Vec<ClbitId>,
}

// Operation is not (de)serializable through derive (it wraps qsynth_core
// types without serde support yet), so Instruction is Serialize/Deserialize
// only insofar as downstream crates need it — left unimplemented here and
// added where a concrete wire format is defined.
impl Serialize for Instruction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("Instruction", 3)?;
        s.serialize_field("op", &self.op.get_repr())?;
        s.serialize_field("qubits", &self.qubits)?;
        s.serialize_field("clbits", &self.clbits)?;
        s.end()
    }
}

impl<'de> Deserialize<'de> for Instruction {
    fn deserialize<D>(_deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Err(serde::de::Error::custom(
            "Instruction deserialization is not supported; operations are reconstructed from \
             their originating representation (QCir, ZX, or tableau), not from a serialized form",
        ))
    }
}

impl Instruction {
    /// Create an instruction applying `op` to `qubits`.
    pub fn gate(op: Operation, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            op,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(op: Operation, qubit: QubitId) -> Self {
        Self::gate(op, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(op: Operation, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(op, [q1, q2])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            op: Operation::Measurement,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a multi-qubit measurement instruction.
    ///
    /// Returns an error if the number of qubits and classical bits do not
    /// match.
    pub fn measure_all(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> crate::error::IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(crate::error::IrError::InvalidDag(format!(
                "measure_all: qubit count ({}) does not match clbit count ({})",
                qubits.len(),
                clbits.len(),
            )));
        }
        Ok(Self {
            op: Operation::Measurement,
            qubits,
            clbits,
        })
    }

    /// Wrap this instruction's operation in an [`Operation::IfElse`] under
    /// `condition`.
    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.op = Operation::if_else(self.op, condition);
        self
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.op, Operation::Measurement)
    }

    /// Check if this is a gate (i.e. not a measurement).
    pub fn is_gate(&self) -> bool {
        !self.is_measure()
    }

    /// Get the name of the instruction's operation.
    pub fn name(&self) -> String {
        self.op.get_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(Operation::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
    }

    #[test]
    fn test_measure_instruction() {
        let inst = Instruction::measure(QubitId(0), ClbitId(0));
        assert!(inst.is_measure());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.clbits.len(), 1);
    }

    #[test]
    fn test_measure_all_length_mismatch() {
        let result = Instruction::measure_all([QubitId(0), QubitId(1)], [ClbitId(0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_with_condition() {
        let cond = ClassicalCondition::new(0b1, 1);
        let inst = Instruction::single_qubit_gate(Operation::x(), QubitId(0)).with_condition(cond);
        assert!(matches!(inst.op, Operation::IfElse { .. }));
    }
}
