//! Integration tests for measurement safety across optimization passes.
//!
//! These tests verify that no optimization pass incorrectly transforms
//! gates across measurement boundaries. This is the key correctness
//! property for quantum compilation with mid-circuit measurements.

use qsynth_compile::passes::{BasicOptimizer, MeasurementBarrierVerification, VerificationResult};
use qsynth_compile::{Pass, PassManagerBuilder, PropertySet};
use qsynth_core::Phase;
use qsynth_ir::{CircuitDag, ClbitId, QCir, QubitId};

/// Helper: count operations of a given kind in a DAG.
fn count_ops(dag: &CircuitDag, kind: &str) -> usize {
    dag.topological_ops()
        .filter(|(_, inst)| inst.name() == kind)
        .count()
}

/// Helper: count measurements in a DAG.
fn count_measurements(dag: &CircuitDag) -> usize {
    dag.topological_ops()
        .filter(|(_, inst)| inst.is_measure())
        .count()
}

/// Helper: collect operation names in topological order for a specific qubit.
fn ops_on_qubit(dag: &CircuitDag, qubit: QubitId) -> Vec<String> {
    dag.topological_ops()
        .filter(|(_, inst)| inst.qubits.contains(&qubit))
        .map(|(_, inst)| inst.name())
        .collect()
}

// ============================================================================
// Test 1: H-Measure-H must NOT be optimized to identity
// ============================================================================

#[test]
fn test_h_measure_h_not_optimized() {
    let mut circuit = QCir::with_size("test", 1, 1);
    circuit.h(QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    let pass = BasicOptimizer::default();
    pass.run(&mut dag, &mut props).unwrap();

    let ops = ops_on_qubit(&dag, QubitId(0));
    assert!(
        ops.contains(&"measure".to_string()),
        "Measurement must survive optimization"
    );
    let meas_idx = ops.iter().position(|op| op == "measure").unwrap();
    assert!(meas_idx > 0, "There should be gates before the measurement");
    assert!(
        meas_idx < ops.len() - 1,
        "There should be gates after the measurement"
    );
}

// ============================================================================
// Test 2: CX-Measure-CX must NOT be cancelled
// ============================================================================

#[test]
fn test_cx_measure_cx_not_cancelled() {
    let mut circuit = QCir::with_size("test", 2, 1);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    let pass = BasicOptimizer::default();
    pass.run(&mut dag, &mut props).unwrap();

    assert_eq!(
        count_ops(&dag, "cx"),
        2,
        "Both CX gates must survive when separated by measurement"
    );
    assert_eq!(count_measurements(&dag), 1);
}

// ============================================================================
// Test 3: Rz(pi)-Measure-Rz(-pi) must NOT be merged
// ============================================================================

#[test]
fn test_rz_measure_rz_not_merged() {
    let mut circuit = QCir::with_size("test", 1, 1);
    circuit.rz(Phase::pi(), QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.rz(-Phase::pi(), QubitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    let pass = BasicOptimizer::default();
    pass.run(&mut dag, &mut props).unwrap();

    let ops = ops_on_qubit(&dag, QubitId(0));
    let gate_count = ops.iter().filter(|op| *op != "measure").count();
    assert!(
        gate_count >= 2,
        "Both Rz gates should survive when separated by measurement, got ops: {ops:?}"
    );
    assert_eq!(count_measurements(&dag), 1);
}

// ============================================================================
// Test 4: Full pipeline with mid-circuit measurement
// ============================================================================

#[test]
fn test_full_pipeline_mid_circuit_measurement() {
    let mut circuit = QCir::with_size("test", 2, 1);
    // Pre-measurement block
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    // Mid-circuit measurement
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    // Post-measurement block
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let mut dag = circuit.into_dag();

    let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(2).build();

    pm.run(&mut dag, &mut props).unwrap();

    assert_eq!(
        count_measurements(&dag),
        1,
        "Mid-circuit measurement must survive full pipeline"
    );

    let ops = ops_on_qubit(&dag, QubitId(0));
    let meas_idx = ops.iter().position(|op| op == "measure");
    assert!(meas_idx.is_some(), "Measurement must be in qubit 0 ops");
    let meas_idx = meas_idx.unwrap();
    assert!(meas_idx > 0, "Gates must exist before measurement on qubit 0");
    assert!(
        meas_idx < ops.len() - 1,
        "Gates must exist after measurement on qubit 0"
    );

    let result = props.get::<VerificationResult>();
    assert!(result.is_some(), "Verification result should be stored");
}

// ============================================================================
// Test 5: Multi-qubit measurement with subsequent gates
// ============================================================================

#[test]
fn test_multi_qubit_measurement_gates_survive() {
    let mut circuit = QCir::with_size("test", 3, 3);
    // Create entangled state
    circuit.h(QubitId(0)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(1), QubitId(2)).unwrap();

    // Measure all
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.measure(QubitId(1), ClbitId(1)).unwrap();
    circuit.measure(QubitId(2), ClbitId(2)).unwrap();

    let measurements_before = count_measurements(circuit.dag());

    let mut dag = circuit.into_dag();
    let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(2).build();

    pm.run(&mut dag, &mut props).unwrap();

    assert_eq!(
        count_measurements(&dag),
        measurements_before,
        "All measurements must survive optimization"
    );
}

// ============================================================================
// Test 6: Adjacent H-H without measurement CAN be cancelled (positive test)
// ============================================================================

#[test]
fn test_adjacent_hh_is_cancelled() {
    let mut circuit = QCir::with_size("test", 1, 0);
    circuit.h(QubitId(0)).unwrap();
    circuit.h(QubitId(0)).unwrap();

    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    let pass = BasicOptimizer::default();
    pass.run(&mut dag, &mut props).unwrap();

    assert_eq!(
        count_ops(&dag, "h"),
        0,
        "Adjacent H-H should be cancelled (H*H = I)"
    );
}

// ============================================================================
// Test 7: Adjacent CX-CX without measurement CAN be cancelled (positive test)
// ============================================================================

#[test]
fn test_adjacent_cx_cx_is_cancelled() {
    let mut circuit = QCir::with_size("test", 2, 0);
    circuit.cx(QubitId(0), QubitId(1)).unwrap();
    circuit.cx(QubitId(0), QubitId(1)).unwrap();

    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    let pass = BasicOptimizer::default();
    pass.run(&mut dag, &mut props).unwrap();

    assert_eq!(
        count_ops(&dag, "cx"),
        0,
        "Adjacent CX-CX should cancel to identity"
    );
}

// ============================================================================
// Test 8: Verification pass detects correct measurement count
// ============================================================================

#[test]
fn test_verification_pass_counts_measurements() {
    let mut circuit = QCir::with_size("test", 3, 3);
    circuit.h(QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.h(QubitId(1)).unwrap();
    circuit.measure(QubitId(1), ClbitId(1)).unwrap();
    circuit.h(QubitId(2)).unwrap();
    circuit.measure(QubitId(2), ClbitId(2)).unwrap();

    let mut dag = circuit.into_dag();
    let mut props = PropertySet::new();

    let pass = MeasurementBarrierVerification;
    pass.run(&mut dag, &mut props).unwrap();

    let result = props.get::<VerificationResult>().unwrap();
    assert!(result.passed);
    assert_eq!(result.measurements_found, 3);
    assert_eq!(result.qubits_checked, 3);
}
