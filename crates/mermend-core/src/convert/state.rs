//! State diagram → flowchart transpilation.
//!
//! Transitions become edges and every distinct state becomes one node; the
//! `[*]` start/end pseudostate collapses to a single circular node. Lines
//! that are not `from --> to[: label]` transitions (notes, composite state
//! blocks, concurrency separators) are dropped.

use super::FxIndexSet;
use super::ids::make_safe_node_id;

pub fn convert_state_to_flowchart(source: &str) -> String {
    let lines: Vec<&str> = source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("stateDiagram"))
        .collect();

    // First pass: collect the distinct states in first-reference order.
    let mut states: FxIndexSet<String> = FxIndexSet::default();
    for line in &lines {
        let Some((from, target)) = split_transition(line) else {
            continue;
        };
        states.insert(from.to_string());
        let (to, _) = split_label(target);
        states.insert(to.to_string());
    }

    let mut flowchart = String::from("flowchart LR\n");

    // One node per state. The sentinel renders exactly once no matter how
    // often it is referenced.
    for state in &states {
        if state == "[*]" {
            flowchart.push_str("    start_end((\"開始/結束\"))\n");
        } else {
            let id = make_safe_node_id(state);
            flowchart.push_str(&format!("    {id}[\"{state}\"]\n"));
        }
    }

    // One edge per transition, in source order. Both endpoints go through
    // the same id mapping so repeated references resolve to the same node.
    for line in &lines {
        let Some((from, target)) = split_transition(line) else {
            tracing::debug!(line = %line, "dropping line without a transition");
            continue;
        };
        let (to, label) = split_label(target);
        let from_id = make_safe_node_id(from);
        let to_id = make_safe_node_id(to);
        match label {
            Some(label) if !label.is_empty() => {
                flowchart.push_str(&format!("    {from_id} -- \"{label}\" --> {to_id}\n"));
            }
            _ => flowchart.push_str(&format!("    {from_id} --> {to_id}\n")),
        }
    }

    flowchart
}

fn split_transition(line: &str) -> Option<(&str, &str)> {
    let (from, target) = line.split_once("-->")?;
    let from = from.trim();
    let target = target.trim();
    if from.is_empty() || target.is_empty() {
        return None;
    }
    Some((from, target))
}

fn split_label(target: &str) -> (&str, Option<&str>) {
    match target.split_once(':') {
        Some((to, label)) => (to.trim(), Some(label.trim())),
        None => (target.trim(), None),
    }
}
