use crate::autograd::graph::discover;
use crate::error::NeuroGradError;
use crate::tensor::Tensor;

const LEAF_COLOR: &str = "#E3F2FD";
const OP_COLOR: &str = "#FFF3E0";

/// Renders the differentiable subgraph behind `roots` in Graphviz DOT format.
///
/// Each node is a box labelled with the producing op (or `leaf`), its id and its shape.
/// Each edge points from an input to the node consuming it, once per use.
pub fn render_dot(roots: &[Tensor]) -> Result<String, NeuroGradError> {
    let graph = discover(roots)?;
    let mut lines = vec![
        "digraph ComputationGraph {".to_string(),
        "    rankdir=BT;".to_string(),
        "    node [shape=box, style=filled];".to_string(),
    ];

    for node in &graph.nodes {
        let (label, color) = match node.op_name() {
            Some(op) => (op, OP_COLOR),
            None => ("leaf", LEAF_COLOR),
        };
        lines.push(format!(
            "    n{} [label=\"{}\\n#{}\\n{:?}\", fillcolor=\"{}\"];",
            node.id().0,
            label,
            node.id().0,
            node.shape(),
            color
        ));
    }

    for (idx, consumers) in graph.consumers.iter().enumerate() {
        let input_id = graph.nodes[idx].id().0;
        for &(consumer, _) in consumers {
            lines.push(format!("    n{} -> n{};", input_id, graph.nodes[consumer].id().0));
        }
    }

    lines.push("}".to_string());
    Ok(lines.join("\n"))
}
