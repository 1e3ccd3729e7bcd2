//! Restructures oversized flat flowcharts into grouped subgraphs.
//!
//! The only contract is the pair of invariants: the output stays valid
//! flowchart source, and no node or edge from the input is dropped. The
//! grouping attribute itself is declaration order, the one property
//! guaranteed to exist in arbitrary generated output.

use regex::Regex;
use std::sync::OnceLock;

/// Tuning for [`convert_long_flowchart_to_grouped`].
#[derive(Debug, Clone, Copy)]
pub struct GrouperOptions {
    /// Line count above which a flowchart counts as long.
    pub line_threshold: usize,
    /// Number of node definitions per generated subgraph.
    pub chunk_size: usize,
}

impl Default for GrouperOptions {
    fn default() -> Self {
        Self {
            line_threshold: 40,
            chunk_size: 8,
        }
    }
}

fn flowchart_header_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:flowchart|graph)\s+(?:TD|TB|LR|RL|BT)\b").expect("valid regex")
    })
}

// A standalone node definition: an identifier followed by a shape opener.
fn node_definition_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+\s*[\[({]").expect("valid regex"))
}

/// True for already-valid `flowchart`/`graph` documents whose line count
/// exceeds the configured threshold.
pub fn is_long_flowchart(code: &str, options: &GrouperOptions) -> bool {
    let trimmed = code.trim();
    let Some(first) = trimmed.lines().next() else {
        return false;
    };
    flowchart_header_regex().is_match(first.trim())
        && trimmed.lines().count() > options.line_threshold
}

/// Wraps runs of standalone node definitions in sequential `subgraph`
/// blocks; edge statements and anything else stay outside the groups, so
/// every node and edge of the input survives.
pub fn convert_long_flowchart_to_grouped(code: &str, options: &GrouperOptions) -> String {
    if !is_long_flowchart(code, options) {
        return code.to_string();
    }
    let trimmed = code.trim();
    if trimmed
        .lines()
        .any(|line| line.trim_start().starts_with("subgraph"))
    {
        // Already structured; regrouping could re-parent nodes.
        return code.to_string();
    }

    let mut lines = trimmed.lines();
    let header = lines.next().unwrap_or_default().trim();

    let mut node_defs: Vec<&str> = Vec::new();
    let mut rest: Vec<&str> = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let is_edge = line.contains("-->")
            || line.contains("---")
            || line.contains("==>")
            || line.contains("-.->");
        if !is_edge && node_definition_line_regex().is_match(line) {
            node_defs.push(line);
        } else {
            rest.push(line);
        }
    }
    if node_defs.is_empty() {
        return code.to_string();
    }

    let mut out = String::with_capacity(trimmed.len() + 64);
    out.push_str(header);
    out.push('\n');
    for (i, chunk) in node_defs.chunks(options.chunk_size).enumerate() {
        out.push_str(&format!("    subgraph part_{}[\"區塊 {}\"]\n", i + 1, i + 1));
        for line in chunk {
            out.push_str("        ");
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("    end\n");
    }
    for line in rest {
        out.push_str("    ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
