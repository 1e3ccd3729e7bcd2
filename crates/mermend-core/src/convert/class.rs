//! Class diagram → flowchart transpilation (degraded).
//!
//! Only `class Name` declarations survive: members, inheritance and
//! association edges are discarded in favor of something the flowchart
//! subset can always render.

use super::FxIndexSet;
use super::ids::{format_entity_name, make_safe_node_id};
use regex::Regex;
use std::sync::OnceLock;

fn class_declaration_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"))
}

pub fn convert_class_to_flowchart(source: &str) -> String {
    let mut names: FxIndexSet<String> = FxIndexSet::default();
    for line in source.lines() {
        if let Some(caps) = class_declaration_regex().captures(line) {
            names.insert(caps[1].to_string());
        }
    }

    let er_shaped = is_er_shaped(source);

    let mut flowchart = String::from("flowchart TD\n");
    for name in &names {
        let id = make_safe_node_id(name);
        let display = if er_shaped {
            format_entity_name(name)
        } else {
            name.clone()
        };
        flowchart.push_str(&format!("    {id}[\"{display}\"]\n"));
    }
    flowchart
}

/// When most `class` names are ALL-CAPS the diagram is really an entity
/// catalog, so display names get title-cased to read as entities.
pub fn is_er_shaped(source: &str) -> bool {
    let mut total = 0usize;
    let mut all_caps = 0usize;
    for line in source.lines() {
        if line.contains("class ") && !line.contains('{') {
            total += 1;
            let name = line.split("class ").nth(1).unwrap_or("").trim();
            if name == name.to_uppercase() && name.chars().count() > 1 {
                all_caps += 1;
            }
        }
    }
    total > 0 && all_caps * 2 > total
}
