//! ER diagram → flowchart transpilation.
//!
//! Cardinality notation is not preserved: every relationship renders as a
//! bold arrow. The goal is a readable graph, not ER fidelity.

use super::FxIndexMap;
use super::ids::{format_entity_name, make_safe_node_id};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
struct Entity {
    attributes: Vec<String>,
}

#[derive(Debug, Clone)]
struct Relationship {
    from: String,
    to: String,
    label: Option<String>,
}

// `ENTITY <run of relation symbols> ENTITY`. Checked before the `{` block
// test: cardinality glyphs like `||--o{` contain a brace and must never
// open an entity block.
fn candidate_relationship_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*\w+\s*[|<>o{}\-]+\s*\w+").expect("valid regex"))
}

fn strict_relationship_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\w+)\s*[|<>o{}\-]+\s*(\w+)\s*(?::\s*(.+))?$").expect("valid regex")
    })
}

fn trailing_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":\s*(.+?)\s*$").expect("valid regex"))
}

pub fn convert_er_to_flowchart(source: &str) -> String {
    // Pass 1: walk lines, collecting the entity table (with verbatim
    // attribute lines) and candidate relationship lines. Candidates are
    // captured textually and resolved later so relationship glyphs cannot
    // interfere with entity-block scanning.
    let mut entities: FxIndexMap<String, Entity> = FxIndexMap::default();
    let mut candidates: Vec<String> = Vec::new();
    let mut open_entity: Option<String> = None;

    for raw_line in source.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with("erDiagram") || line.starts_with("%%") {
            continue;
        }

        if let Some(name) = open_entity.clone() {
            if line.contains('}') {
                open_entity = None;
            } else {
                entities.entry(name).or_default().attributes.push(line.to_string());
            }
            continue;
        }

        if candidate_relationship_regex().is_match(line) {
            candidates.push(line.to_string());
            continue;
        }

        if let Some(idx) = line.find('{') {
            let name = line[..idx].trim();
            if !name.is_empty() {
                entities.entry(name.to_string()).or_default();
                // `NAME { }` on one line never opens a block.
                if !line[idx..].contains('}') {
                    open_entity = Some(name.to_string());
                }
            }
            continue;
        }

        // Standalone entity declaration.
        if line != "direction"
            && !line.starts_with("direction ")
            && line.chars().all(|c| c.is_alphanumeric() || c == '_')
        {
            entities.entry(line.to_string()).or_default();
        }
    }

    // Pass 2: resolve candidates against the entity table.
    let relationships: Vec<Relationship> = candidates
        .iter()
        .filter_map(|line| parse_relationship(line, &entities))
        .collect();

    let mut flowchart = String::from("flowchart LR\n");

    for (name, entity) in &entities {
        let id = make_safe_node_id(name);
        let display = format_entity_name(name);
        if entity.attributes.is_empty() {
            flowchart.push_str(&format!("    {id}[\"{display}\"]\n"));
        } else {
            // `===` is a visual separator between the title and the
            // attribute block, not flowchart syntax.
            let body = entity.attributes.join("\n");
            flowchart.push_str(&format!("    {id}[\"{display}\n===\n{body}\"]\n"));
        }
    }

    if relationships.is_empty() && entities.len() >= 2 {
        // Nothing resolved: link the leading entities so the output is
        // never a disconnected node cloud.
        let ids: Vec<String> = entities
            .keys()
            .take(3)
            .map(|name| make_safe_node_id(name))
            .collect();
        flowchart.push_str(&format!("    {} ===\"關聯\"===> {}\n", ids[0], ids[1]));
        if let Some(third) = ids.get(2) {
            flowchart.push_str(&format!("    {} ===\"關聯\"===> {}\n", ids[1], third));
        }
    } else {
        for rel in &relationships {
            let from = make_safe_node_id(&rel.from);
            let to = make_safe_node_id(&rel.to);
            match &rel.label {
                Some(label) => {
                    flowchart.push_str(&format!("    {from} ===\"{label}\"===> {to}\n"));
                }
                None => flowchart.push_str(&format!("    {from} ===> {to}\n")),
            }
        }
    }

    flowchart
}

fn parse_relationship(line: &str, entities: &FxIndexMap<String, Entity>) -> Option<Relationship> {
    if let Some(caps) = strict_relationship_regex().captures(line) {
        let from = caps[1].to_string();
        let to = caps[2].to_string();
        if entities.contains_key(&from) && entities.contains_key(&to) {
            let label = caps
                .get(3)
                .map(|m| m.as_str().trim().trim_matches('"').to_string())
                .filter(|label| !label.is_empty());
            return Some(Relationship { from, to, label });
        }
        tracing::debug!(line = %line, "dropping relationship with unknown entity");
        return None;
    }

    // Permissive fallback: strip a trailing `: label`, throw away tokens
    // made purely of relation symbols, and take the first and last of what
    // remains. Ambiguous for lines with more than two word tokens; kept
    // deliberately lenient.
    let label = trailing_label_regex()
        .captures(line)
        .map(|caps| caps[1].trim_matches('"').to_string())
        .filter(|label| !label.is_empty());
    let head = match line.find(':') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let tokens: Vec<&str> = head
        .split_whitespace()
        .filter(|token| !is_symbol_token(token))
        .collect();
    if tokens.len() < 2 {
        tracing::debug!(line = %line, "dropping unparseable relationship line");
        return None;
    }
    let from = tokens[0];
    let to = tokens[tokens.len() - 1];
    if entities.contains_key(from) && entities.contains_key(to) {
        return Some(Relationship {
            from: from.to_string(),
            to: to.to_string(),
            label,
        });
    }
    tracing::debug!(line = %line, "dropping relationship with unknown entity");
    None
}

fn is_symbol_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| matches!(c, '|' | '<' | '>' | 'o' | '{' | '}' | '-'))
}
