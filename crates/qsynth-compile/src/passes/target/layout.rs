//! Trivial layout: maps logical qubit i to physical qubit i.
//!
//! This exists solely to populate [`PropertySet::layout`] for the optional
//! [`super::ConnectivityCheck`] — nothing downstream ever inserts SWAPs off
//! the back of it.

use qsynth_ir::{CircuitDag, CircuitLevel};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{Layout, PropertySet};

pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    #[allow(clippy::cast_possible_truncation)]
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling_map = properties
            .coupling_map
            .as_ref()
            .ok_or(CompileError::MissingCouplingMap)?;

        let num_logical = dag.num_qubits();
        let num_physical = coupling_map.num_qubits() as usize;

        if num_logical > num_physical {
            return Err(CompileError::CircuitTooLarge {
                required: num_logical,
                available: coupling_map.num_qubits(),
            });
        }

        properties.layout = Some(Layout::trivial(num_logical as u32));
        dag.set_level(CircuitLevel::Physical);

        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.layout.is_none() && properties.coupling_map.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{BasisGates, CouplingMap};
    use qsynth_ir::{CircuitLevel, QCir, QubitId};

    #[test]
    fn test_trivial_layout() {
        let mut circuit = QCir::with_size("test", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();

        assert_eq!(dag.level(), CircuitLevel::Logical);

        let mut props = PropertySet::new().with_target(CouplingMap::linear(5), BasisGates::iqm());

        TrivialLayout.run(&mut dag, &mut props).unwrap();

        let layout = props.layout.as_ref().unwrap();
        assert_eq!(layout.get_physical(QubitId(0)), Some(0));
        assert_eq!(layout.get_physical(QubitId(1)), Some(1));
        assert_eq!(layout.get_physical(QubitId(2)), Some(2));
        assert_eq!(dag.level(), CircuitLevel::Physical);
    }

    #[test]
    fn test_trivial_layout_too_large() {
        let circuit = QCir::with_size("test", 10, 0);
        let mut dag = circuit.into_dag();

        let mut props = PropertySet::new().with_target(CouplingMap::linear(5), BasisGates::iqm());

        let result = TrivialLayout.run(&mut dag, &mut props);
        assert!(matches!(result, Err(CompileError::CircuitTooLarge { .. })));
    }
}
