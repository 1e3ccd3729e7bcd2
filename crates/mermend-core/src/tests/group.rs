use crate::convert::{GrouperOptions, convert_long_flowchart_to_grouped, is_long_flowchart};

fn long_flowchart(nodes: usize) -> String {
    let mut code = String::from("flowchart TD\n");
    for i in 0..nodes {
        code.push_str(&format!("    N{i}[\"step {i}\"]\n"));
    }
    for i in 0..nodes.saturating_sub(1) {
        code.push_str(&format!("    N{i} --> N{}\n", i + 1));
    }
    code
}

#[test]
fn short_documents_are_left_alone() {
    let code = long_flowchart(5);
    let options = GrouperOptions::default();
    assert!(!is_long_flowchart(&code, &options));
    assert_eq!(convert_long_flowchart_to_grouped(&code, &options), code);
}

#[test]
fn non_flowchart_documents_are_never_long() {
    let options = GrouperOptions::default();
    assert!(!is_long_flowchart("stateDiagram-v2\nA --> B", &options));
    assert!(!is_long_flowchart("", &options));
}

#[test]
fn grouping_preserves_every_node_and_edge() {
    let code = long_flowchart(30);
    let options = GrouperOptions::default();
    assert!(is_long_flowchart(&code, &options));
    let out = convert_long_flowchart_to_grouped(&code, &options);

    for line in code.lines().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        assert!(out.contains(line), "line {line:?} must survive grouping");
    }
    assert!(out.starts_with("flowchart TD\n"));
    assert!(out.contains("subgraph part_1[\"區塊 1\"]"));
    // 30 nodes in chunks of 8 → 4 groups, each closed.
    assert_eq!(out.matches("subgraph part_").count(), 4);
    assert_eq!(out.matches("\n    end\n").count(), 4);
}

#[test]
fn chunk_size_is_configurable() {
    let code = long_flowchart(30);
    let options = GrouperOptions {
        line_threshold: 10,
        chunk_size: 10,
    };
    let out = convert_long_flowchart_to_grouped(&code, &options);
    assert_eq!(out.matches("subgraph part_").count(), 3);
}

#[test]
fn documents_with_subgraphs_are_not_regrouped() {
    let mut code = String::from("flowchart TD\n    subgraph existing\n");
    for i in 0..50 {
        code.push_str(&format!("    N{i}[\"n\"] --> M{i}\n"));
    }
    code.push_str("    end\n");
    let options = GrouperOptions::default();
    assert_eq!(convert_long_flowchart_to_grouped(&code, &options), code);
}
