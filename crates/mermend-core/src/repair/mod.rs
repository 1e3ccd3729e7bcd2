//! Textual repair rules for flowchart-family source.
//!
//! Generated diagram text is not guaranteed to be syntactically valid; each
//! rule here targets one concrete malformation observed in model output.
//! The rules are deliberately small string rewrites rather than a grammar:
//! the requirement is maximal leniency over near-miss syntax, not rejection
//! of invalid input.
//!
//! The composed pipeline is idempotent: running it on its own output yields
//! the same string.

use regex::Regex;
use std::sync::OnceLock;

/// A single named rewrite over diagram source.
#[derive(Debug, Clone, Copy)]
pub struct RepairRule {
    pub id: &'static str,
    pub apply: fn(&str) -> String,
}

/// Rule order is significant. `unescape_artifacts` must run before
/// `quote_labels_needing_quotes`, otherwise the quoting pass misreads
/// literal backslash-quote sequences; `hoist_subgraph_direction` must run
/// before the terminator rewrite so the hoisted statement keeps its own
/// line.
pub const RULES: &[RepairRule] = &[
    RepairRule {
        id: "unescape_artifacts",
        apply: unescape_artifacts,
    },
    RepairRule {
        id: "strip_code_fence",
        apply: strip_code_fence,
    },
    RepairRule {
        id: "strip_mermaid_prefix",
        apply: strip_mermaid_prefix,
    },
    RepairRule {
        id: "hoist_subgraph_direction",
        apply: hoist_subgraph_direction,
    },
    RepairRule {
        id: "newline_after_terminators",
        apply: newline_after_terminators,
    },
    RepairRule {
        id: "split_adjacent_node_defs",
        apply: split_adjacent_node_defs,
    },
    RepairRule {
        id: "collapse_blank_lines",
        apply: collapse_blank_lines,
    },
    RepairRule {
        id: "quote_labels_needing_quotes",
        apply: quote_labels_needing_quotes,
    },
];

/// Runs the full repair pipeline over flowchart-family source.
///
/// Pure and total: never fails, and empty input yields an empty string.
pub fn clean_mermaid_code(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let mut code = raw.to_string();
    for rule in RULES {
        code = (rule.apply)(&code);
    }
    code.trim().to_string()
}

/// The prefix of the rule chain that is safe to run before dialect
/// detection: escape repair and fence/prefix stripping do not depend on the
/// dialect, but they do decide what the first line looks like.
pub(crate) fn preclean(raw: &str) -> String {
    let mut code = unescape_artifacts(raw);
    code = strip_code_fence(&code);
    code = strip_mermaid_prefix(&code);
    code.trim().to_string()
}

/// Models escape quote and bracket characters that were meant literally.
fn unescape_artifacts(input: &str) -> String {
    input
        .replace("\\\"", "\"")
        .replace("\\[", "[")
        .replace("\\]", "]")
}

fn leading_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```(?:mermaid)?\s*\n").expect("valid regex"))
}

fn trailing_fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*```\s*$").expect("valid regex"))
}

/// Strips a surrounding Markdown code fence, with or without a `mermaid`
/// language tag.
fn strip_code_fence(input: &str) -> String {
    let stripped = leading_fence_regex().replacen(input.trim_start(), 1, "");
    trailing_fence_regex().replace(&stripped, "").to_string()
}

fn mermaid_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^mermaid\s*\n?").expect("valid regex"))
}

/// Drops a bare leading `mermaid` line some models emit above the diagram.
fn strip_mermaid_prefix(input: &str) -> String {
    let trimmed = input.trim_start();
    if !trimmed.starts_with("mermaid") {
        return input.to_string();
    }
    mermaid_prefix_regex().replacen(trimmed, 1, "").to_string()
}

fn subgraph_direction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(subgraph\s+[^\n{]*\{)([^\n]*)(\s*direction\s+(?:LR|TB|RL|BT))")
            .expect("valid regex")
    })
}

/// A `direction` declaration must be the first statement inside a
/// `subgraph { ... }` block; models often emit it after other statements.
fn hoist_subgraph_direction(input: &str) -> String {
    subgraph_direction_regex()
        .replace_all(input, |caps: &regex::Captures| {
            let header = &caps[1];
            let content = caps[2].trim();
            let direction = caps[3].trim();
            if content.is_empty() {
                format!("{header}\n    {direction}")
            } else {
                format!("{header}\n    {direction}\n    {content}")
            }
        })
        .to_string()
}

fn terminator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([;}\]])([^\s;}\]])").expect("valid regex"))
}

/// Separates statements that models squeeze onto one line: a `;`, `}` or `]`
/// terminator directly followed by the next statement gets a newline.
fn newline_after_terminators(input: &str) -> String {
    replace_to_fixpoint(terminator_regex(), input, "$1\n$2")
}

fn adjacent_node_defs_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\w\s*\[[^\]\n]*\])(\w)").expect("valid regex"))
}

/// Two node definitions with no separator between them each get their own
/// line.
fn split_adjacent_node_defs(input: &str) -> String {
    replace_to_fixpoint(adjacent_node_defs_regex(), input, "$1\n$2")
}

// The regex crate has no lookahead, so rules that must not consume the
// following character iterate to a fixpoint instead. Each pass strictly
// shortens the set of remaining match sites, so this terminates.
fn replace_to_fixpoint(re: &Regex, input: &str, replacement: &str) -> String {
    let mut out = input.to_string();
    loop {
        let next = re.replace_all(&out, replacement).to_string();
        if next == out {
            return out;
        }
        out = next;
    }
}

fn blank_lines_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

fn collapse_blank_lines(input: &str) -> String {
    blank_lines_regex().replace_all(input, "\n\n").to_string()
}

fn bracket_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\[\]\n]*)\]").expect("valid regex"))
}

fn is_cjk(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&ch)
}

/// Unquoted `[label]` content containing CJK text or whitespace breaks the
/// downstream parser; wrap it in quotes. Labels that already carry quotes
/// anywhere are left alone.
fn quote_labels_needing_quotes(input: &str) -> String {
    bracket_label_regex()
        .replace_all(input, |caps: &regex::Captures| {
            let label = &caps[1];
            let needs_quotes = !label.is_empty()
                && !label.contains('"')
                && label.chars().any(|c| is_cjk(c) || c.is_whitespace());
            if needs_quotes {
                format!("[\"{label}\"]")
            } else {
                caps[0].to_string()
            }
        })
        .to_string()
}
