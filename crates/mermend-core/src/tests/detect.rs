use crate::*;

#[test]
fn detects_every_dialect_by_its_first_line_keyword() {
    let reg = DetectorRegistry::default_dialects();
    assert_eq!(reg.detect("graph TD;A-->B;"), Dialect::Flowchart);
    assert_eq!(reg.detect("flowchart LR\nA --> B"), Dialect::Flowchart);
    assert_eq!(reg.detect("sequenceDiagram\nAlice->>Bob: hi"), Dialect::SequenceDiagram);
    assert_eq!(reg.detect("classDiagram\nclass Foo"), Dialect::ClassDiagram);
    assert_eq!(reg.detect("stateDiagram-v2\n[*] --> A"), Dialect::StateDiagram);
    assert_eq!(reg.detect("erDiagram\nUSER {\n}"), Dialect::ErDiagram);
    assert_eq!(reg.detect("gantt\ntitle x"), Dialect::Gantt);
    assert_eq!(reg.detect("pie\n\"a\": 1"), Dialect::Pie);
    assert_eq!(reg.detect("journey\ntitle x"), Dialect::Journey);
}

#[test]
fn keyword_must_sit_on_the_first_nonempty_line() {
    let reg = DetectorRegistry::default_dialects();
    assert_eq!(reg.detect("\n\n  flowchart TD\nA --> B"), Dialect::Flowchart);
    assert_eq!(reg.detect("here is a diagram:\nflowchart TD"), Dialect::Unknown);
    assert_eq!(reg.detect(""), Dialect::Unknown);
}

#[test]
fn flowchart_with_direction_token_matches_as_a_pattern() {
    let reg = DetectorRegistry::default_dialects();
    assert_eq!(reg.detect("graph BT\nA --> B"), Dialect::Flowchart);
    assert_eq!(reg.detect("flowchart RL\nA --> B"), Dialect::Flowchart);
}

#[test]
fn prose_with_cjk_punctuation_is_not_diagram_code() {
    let reg = DetectorRegistry::default_dialects();
    assert!(!reg.looks_like_diagram_code("flowchart TD，這不是圖表代碼。"));
    assert!(!reg.looks_like_diagram_code("這段文字說明了如何畫圖，但它不是代碼。"));
}

#[test]
fn long_single_line_blobs_are_not_diagram_code() {
    let reg = DetectorRegistry::default_dialects();
    let blob = format!("graph {}", "x".repeat(120));
    assert!(!reg.looks_like_diagram_code(&blob));
}

#[test]
fn flowchart_text_needs_structural_evidence() {
    let reg = DetectorRegistry::default_dialects();
    // Keyword alone is not enough.
    assert!(!reg.looks_like_diagram_code("flowchart TD"));
    // An edge plus a node definition is.
    assert!(reg.looks_like_diagram_code("flowchart TD\nA[開始] --> B[結束]"));
    // An edge plus a subgraph or a comment also counts.
    assert!(reg.looks_like_diagram_code("graph LR\nsubgraph S\nA --> B\nend"));
    assert!(reg.looks_like_diagram_code("graph LR\n%% note\nA --> B"));
}

#[test]
fn non_flowchart_dialects_only_need_their_keyword() {
    let reg = DetectorRegistry::default_dialects();
    assert!(reg.looks_like_diagram_code("erDiagram\nUSER ||--o{ ORDER : places"));
    assert!(reg.looks_like_diagram_code("stateDiagram-v2\nIdle --> Busy"));
}

#[test]
fn dialects_display_as_their_keyword() {
    assert_eq!(Dialect::StateDiagram.to_string(), "stateDiagram");
    assert_eq!(Dialect::ErDiagram.to_string(), "erDiagram");
    assert_eq!(Dialect::Unknown.to_string(), "unknown");
}
