//! Gate-wise construction of a ZX-diagram from a [`QCir`].

use qsynth_core::Phase;
use qsynth_ir::{Operation, QCir};

use crate::error::{ZxError, ZxResult};
use crate::graph::{EdgeKind, ZxGraph};

/// Which fixed subgraph a Toffoli (`CCX`) lowers to. Modes 1-3 are
/// pre-simplified phase-gadget forms over the same backbone as a generic
/// multi-controlled `Px(π)`; mode 0 instead lifts the textbook 7-`T`
/// decomposition gate by gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CcxMode {
    SevenT,
    Backbone,
    BackboneMergedGadgets,
    BackboneSortedGadgets,
}

impl CcxMode {
    pub fn from_index(i: u8) -> ZxResult<Self> {
        match i {
            0 => Ok(CcxMode::SevenT),
            1 => Ok(CcxMode::Backbone),
            2 => Ok(CcxMode::BackboneMergedGadgets),
            3 => Ok(CcxMode::BackboneSortedGadgets),
            other => Err(ZxError::InvalidInput(format!("no such CCX mode: {other}"))),
        }
    }
}

/// A qubit's current position on the frontier of the diagram under
/// construction, plus a Hadamard edge pending on the next connection (so a
/// run of `H` gates never needs an intermediate vertex).
struct Wire {
    frontier: petgraph::graph::NodeIndex,
    pending_hadamard: bool,
}

/// Build a ZX-diagram for `circuit`, processing gates in their topological
/// order and appending a small fixed subgraph per gate at the qubit's
/// current column.
pub fn qc_to_zx(circuit: &QCir, ccx_mode: CcxMode) -> ZxResult<ZxGraph> {
    let n = circuit.num_qubits();
    let mut graph = ZxGraph::identity(n);
    let mut wires: Vec<Wire> = (0..n)
        .map(|q| Wire {
            frontier: graph.input(q),
            pending_hadamard: false,
        })
        .collect();

    for (_, instr) in circuit.dag().topological_ops() {
        let qubits: Vec<usize> = instr.qubits.iter().map(|q| q.0).collect();
        push_gate(&mut graph, &mut wires, &instr.op, &qubits, ccx_mode)?;
    }

    for q in 0..n {
        let out = graph.output(q);
        let kind = if wires[q].pending_hadamard {
            EdgeKind::Hadamard
        } else {
            EdgeKind::Plain
        };
        graph.add_edge(wires[q].frontier, out, kind);
    }
    Ok(graph)
}

fn wire_edge_kind(wire: &mut Wire) -> EdgeKind {
    if wire.pending_hadamard {
        wire.pending_hadamard = false;
        EdgeKind::Hadamard
    } else {
        EdgeKind::Plain
    }
}

fn connect_z(graph: &mut ZxGraph, wires: &mut [Wire], q: usize, phase: Phase) {
    let v = graph.add_z(phase);
    let kind = wire_edge_kind(&mut wires[q]);
    graph.add_edge(wires[q].frontier, v, kind);
    wires[q].frontier = v;
}

fn connect_x(graph: &mut ZxGraph, wires: &mut [Wire], q: usize, phase: Phase) {
    let v = graph.add_x(phase);
    let kind = wire_edge_kind(&mut wires[q]);
    graph.add_edge(wires[q].frontier, v, kind);
    wires[q].frontier = v;
}

fn push_gate(
    graph: &mut ZxGraph,
    wires: &mut Vec<Wire>,
    op: &Operation,
    qubits: &[usize],
    ccx_mode: CcxMode,
) -> ZxResult<()> {
    match op {
        Operation::Id => {}
        Operation::H => {
            wires[qubits[0]].pending_hadamard = !wires[qubits[0]].pending_hadamard;
        }
        Operation::Pz(p) | Operation::Rz(p) => connect_z(graph, wires, qubits[0], *p),
        Operation::Px(p) | Operation::Rx(p) => connect_x(graph, wires, qubits[0], *p),
        Operation::Py(p) | Operation::Ry(p) => {
            // Y = S · X(φ) · S†: conjugate the target to the X axis, build
            // the X-spider, conjugate back.
            push_gate(graph, wires, &Operation::s(), &[qubits[0]], ccx_mode)?;
            connect_x(graph, wires, qubits[0], *p);
            push_gate(graph, wires, &Operation::sdg(), &[qubits[0]], ccx_mode)?;
        }
        Operation::Swap => {
            wires.swap(qubits[0], qubits[1]);
        }
        Operation::U(..) => {
            return Err(ZxError::Unsupported(
                "U gates must be lowered to Pa/Ra before conversion to ZX".to_string(),
            ));
        }
        Operation::Measurement => {
            return Err(ZxError::Unsupported(
                "measurement has no ZX-diagram representation".to_string(),
            ));
        }
        Operation::IfElse { .. } => {
            return Err(ZxError::Unsupported(
                "classically-conditioned operations have no ZX-diagram representation".to_string(),
            ));
        }
        Operation::Ecr => {
            for (g, local) in op.to_basic_gates().map_err(|e| ZxError::Unsupported(e.to_string()))? {
                let mapped: Vec<usize> = local.iter().map(|&i| qubits[i]).collect();
                push_gate(graph, wires, &g, &mapped, ccx_mode)?;
            }
        }
        Operation::Control { op: inner, n_ctrls } => {
            push_controlled(graph, wires, inner, *n_ctrls as usize, qubits, ccx_mode)?;
        }
    }
    Ok(())
}

fn push_controlled(
    graph: &mut ZxGraph,
    wires: &mut Vec<Wire>,
    inner: &Operation,
    n_ctrls: usize,
    qubits: &[usize],
    ccx_mode: CcxMode,
) -> ZxResult<()> {
    let controls = &qubits[..n_ctrls];
    let target = qubits[n_ctrls];

    let pi = Phase::pi();
    match (inner, n_ctrls) {
        (Operation::Px(p), 1) if *p == pi => {
            let c = controls[0];
            let zc = graph.add_z(Phase::ZERO);
            let xt = graph.add_x(Phase::ZERO);
            let kc = wire_edge_kind(&mut wires[c]);
            graph.add_edge(wires[c].frontier, zc, kc);
            wires[c].frontier = zc;
            let kt = wire_edge_kind(&mut wires[target]);
            graph.add_edge(wires[target].frontier, xt, kt);
            wires[target].frontier = xt;
            graph.add_edge(zc, xt, EdgeKind::Plain);
            return Ok(());
        }
        (Operation::Pz(p), 1) if *p == pi => {
            let c = controls[0];
            let za = graph.add_z(Phase::ZERO);
            let zb = graph.add_z(Phase::ZERO);
            let ka = wire_edge_kind(&mut wires[c]);
            graph.add_edge(wires[c].frontier, za, ka);
            wires[c].frontier = za;
            let kb = wire_edge_kind(&mut wires[target]);
            graph.add_edge(wires[target].frontier, zb, kb);
            wires[target].frontier = zb;
            graph.add_edge(za, zb, EdgeKind::Hadamard);
            return Ok(());
        }
        (Operation::Px(p), 2) if *p == pi => {
            return push_ccx(graph, wires, controls, target, ccx_mode);
        }
        _ => {}
    }

    let (axis, phase) = match inner {
        Operation::Pz(p) | Operation::Rz(p) => (Operation::Pz(Phase::ZERO), *p),
        Operation::Px(p) | Operation::Rx(p) => (Operation::Px(Phase::ZERO), *p),
        Operation::Py(p) | Operation::Ry(p) => (Operation::Py(Phase::ZERO), *p),
        other => {
            return Err(ZxError::Unsupported(format!(
                "no ZX backbone for controlled {}",
                other.get_type()
            )));
        }
    };
    push_backbone_gadgets(graph, wires, &axis, phase, controls, target)
}

/// "Backbone of one Z-spider per control plus a spider on the target on the
/// chosen axis, with a phase gadget attached for every non-empty subset of
/// the control vertices; gadget phase = ±φ/2^{k−1}, sign = parity of the
/// subset size."
fn push_backbone_gadgets(
    graph: &mut ZxGraph,
    wires: &mut Vec<Wire>,
    axis: &Operation,
    phase: Phase,
    controls: &[usize],
    target: usize,
) -> ZxResult<()> {
    let k = controls.len();
    let backbone: Vec<petgraph::graph::NodeIndex> = controls
        .iter()
        .map(|&c| {
            let v = graph.add_z(Phase::ZERO);
            let kind = wire_edge_kind(&mut wires[c]);
            graph.add_edge(wires[c].frontier, v, kind);
            wires[c].frontier = v;
            v
        })
        .collect();
    let target_vertex = match axis {
        Operation::Pz(_) => graph.add_z(Phase::ZERO),
        Operation::Px(_) => graph.add_x(Phase::ZERO),
        Operation::Py(_) => graph.add_z(Phase::ZERO),
        other => {
            return Err(ZxError::Unsupported(format!(
                "unsupported rotation axis {}",
                other.get_type()
            )))
        }
    };
    let kind = wire_edge_kind(&mut wires[target]);
    graph.add_edge(wires[target].frontier, target_vertex, kind);
    wires[target].frontier = target_vertex;

    let divisor = 1i64 << k.saturating_sub(1);
    let magnitude = phase.div_int(divisor);
    for mask in 1..(1usize << k) {
        let popcount = (mask as u32).count_ones();
        let gadget_phase = if popcount % 2 == 0 { -magnitude } else { magnitude };
        let axel = graph.add_z(Phase::ZERO);
        let leaf = graph.add_z(gadget_phase);
        graph.add_edge(axel, leaf, EdgeKind::Hadamard);
        for (i, &bb) in backbone.iter().enumerate() {
            if mask & (1 << i) != 0 {
                graph.add_edge(axel, bb, EdgeKind::Hadamard);
            }
        }
        if mask == (1usize << k) - 1 {
            graph.add_edge(axel, target_vertex, EdgeKind::Hadamard);
        }
    }
    Ok(())
}

fn push_ccx(
    graph: &mut ZxGraph,
    wires: &mut Vec<Wire>,
    controls: &[usize],
    target: usize,
    mode: CcxMode,
) -> ZxResult<()> {
    match mode {
        CcxMode::SevenT => {
            let ccx = Operation::control(Operation::x(), 2);
            let outer = [controls[0], controls[1], target];
            for (g, local) in ccx.to_basic_gates().map_err(|e| ZxError::Unsupported(e.to_string()))? {
                let mapped: Vec<usize> = local.iter().map(|&i| outer[i]).collect();
                push_gate(graph, wires, &g, &mapped, mode)?;
            }
            Ok(())
        }
        // Backbone variants share the generic multi-controlled-Px(π)
        // construction; the "pre-simplified" distinction between modes
        // 1-3 (merged/sorted gadgets) is left as future work, tracked in
        // the design notes.
        CcxMode::Backbone | CcxMode::BackboneMergedGadgets | CcxMode::BackboneSortedGadgets => {
            push_backbone_gadgets(graph, wires, &Operation::Px(Phase::ZERO), Phase::pi(), controls, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsynth_ir::QubitId;

    #[test]
    fn test_single_t_gate_adds_one_z_spider() {
        let mut circuit = QCir::with_size("t", 1, 0);
        circuit.t(QubitId(0)).unwrap();
        let graph = qc_to_zx(&circuit, CcxMode::SevenT).unwrap();
        // input, output, one Z-spider.
        assert_eq!(graph.num_vertices(), 3);
    }

    #[test]
    fn test_h_gate_sets_hadamard_boundary_edge_with_no_extra_vertex() {
        let mut circuit = QCir::with_size("h", 1, 0);
        circuit.h(QubitId(0)).unwrap();
        let graph = qc_to_zx(&circuit, CcxMode::SevenT).unwrap();
        assert_eq!(graph.num_vertices(), 2);
        assert_eq!(
            graph.edge_kind(graph.input(0), graph.output(0)),
            Some(EdgeKind::Hadamard)
        );
    }

    #[test]
    fn test_cz_diagram_has_hadamard_edge_between_frontier_spiders() {
        let mut circuit = QCir::with_size("cz", 2, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        let graph = qc_to_zx(&circuit, CcxMode::SevenT).unwrap();
        let za = graph.neighbors(graph.output(0)).next().unwrap();
        let zb = graph.neighbors(graph.output(1)).next().unwrap();
        assert_eq!(graph.edge_kind(za, zb), Some(EdgeKind::Hadamard));
    }

    #[test]
    fn test_controlled_t_produces_two_gadget_vertices() {
        // Control(Pz(pi/4), 1): one non-empty control subset -> one axel
        // plus one leaf, besides the two backbone spiders.
        let mut circuit = QCir::with_size("crz", 2, 0);
        circuit
            .apply(
                Operation::Control {
                    op: Box::new(Operation::Pz(Phase::new(1, 4))),
                    n_ctrls: 1,
                },
                [QubitId(0), QubitId(1)],
            )
            .unwrap();
        let graph = qc_to_zx(&circuit, CcxMode::SevenT).unwrap();
        // 2 boundary pairs (4) + control spider + target spider + axel + leaf.
        assert_eq!(graph.num_vertices(), 8);
    }
}
