use crate::convert::convert_state_to_flowchart;
use crate::*;

#[test]
fn output_is_flowchart_with_no_state_keywords_left() {
    let out = convert_state_to_flowchart("stateDiagram-v2\nIdle --> Busy: start\nBusy --> Idle: stop\n");
    assert!(out.starts_with("flowchart LR\n"));
    assert!(!out.contains("stateDiagram"));
}

#[test]
fn the_start_end_sentinel_collapses_to_one_node() {
    let out = convert_state_to_flowchart("stateDiagram-v2\n[*] --> A\nA --> [*]\n");
    assert_eq!(out.matches("start_end((").count(), 1);
    assert!(out.contains("start_end --> A"));
    assert!(out.contains("A --> start_end"));
}

#[test]
fn every_referenced_state_becomes_exactly_one_node() {
    let out = convert_state_to_flowchart(
        "stateDiagram-v2\nA --> B\nB --> C\nC --> A\nA --> C\n",
    );
    for node in ["A[\"A\"]", "B[\"B\"]", "C[\"C\"]"] {
        assert_eq!(out.matches(node).count(), 1, "{node} must appear once");
    }
}

#[test]
fn transition_labels_are_carried_onto_the_edge() {
    let out = convert_state_to_flowchart("stateDiagram\nIdle --> Busy: 開始工作\n");
    assert!(out.contains("Idle -- \"開始工作\" --> Busy"));
}

#[test]
fn lines_without_transitions_are_dropped_silently() {
    let out = convert_state_to_flowchart(
        "stateDiagram-v2\nnote right of A: remember this\nA --> B\nstate Composite {\n",
    );
    assert!(out.contains("A --> B"));
    assert!(!out.contains("note right"));
    assert!(!out.contains("Composite"));
}

#[test]
fn state_names_with_spaces_share_one_sanitized_id() {
    let out = convert_state_to_flowchart(
        "stateDiagram-v2\nMy State --> Done\nDone --> My State\n",
    );
    assert_eq!(out.matches("My_State[\"My State\"]").count(), 1);
    assert!(out.contains("My_State --> Done"));
    assert!(out.contains("Done --> My_State"));
}
