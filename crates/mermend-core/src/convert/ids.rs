/// Maps an arbitrary state/entity name onto an identifier the flowchart
/// grammar accepts: ASCII word characters and CJK pass through, everything
/// else becomes `_`, and a leading digit gets an `n` prefix.
///
/// The `[*]` start/end pseudostate always maps onto the shared `start_end`
/// id, so every occurrence collapses to the same node.
pub fn make_safe_node_id(raw: &str) -> String {
    if raw == "[*]" {
        return "start_end".to_string();
    }

    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        let keep =
            ch.is_ascii_alphanumeric() || ch == '_' || ('\u{4E00}'..='\u{9FA5}').contains(&ch);
        out.push(if keep { ch } else { '_' });
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, 'n');
    }
    out
}

/// ALL-CAPS entity names read better title-cased; anything else is shown
/// as written.
pub fn format_entity_name(name: &str) -> String {
    let all_caps = name == name.to_uppercase() && name.chars().count() > 1;
    if !all_caps {
        return name.to_string();
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{first}{}", chars.as_str().to_lowercase()),
        None => String::new(),
    }
}
