//! Reassembles AI streaming responses.
//!
//! The transport may split JSON envelopes at arbitrary byte boundaries, so
//! [`JsonStreamAssembler`] keeps a rolling buffer and extracts balanced
//! `{...}` spans from it. A single malformed envelope is skipped rather
//! than aborting the stream. Chunks must be fed strictly in arrival order;
//! dropping an assembler mid-stream simply yields no final code.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One JSON-encoded unit of the streaming protocol.
///
/// Exactly one of `chunk` (progress) or `mermaid_code` (finality) is
/// meaningfully populated per envelope; `done` marks the terminal one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mermaid_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental content, in generation order.
    Chunk(String),
    /// The final code carried by the terminal envelope.
    Completed(String),
}

/// Client-side assembler for the envelope stream.
#[derive(Debug, Default)]
pub struct JsonStreamAssembler {
    buffer: String,
    final_code: Option<String>,
}

impl JsonStreamAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport read and returns the events completed by it.
    ///
    /// An envelope carrying `error` aborts with [`Error::Stream`]; a span
    /// that fails to parse is skipped and processing continues.
    pub fn push(&mut self, chunk: &str) -> Result<Vec<StreamEvent>> {
        self.buffer.push_str(chunk);

        let mut events = Vec::new();
        let mut consumed = 0usize;
        while let Some((open, close)) = find_json_object_end(&self.buffer, consumed) {
            let span = &self.buffer[open..=close];
            consumed = close + 1;

            let envelope: StreamEnvelope = match serde_json::from_str(span) {
                Ok(envelope) => envelope,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping malformed stream envelope");
                    continue;
                }
            };

            if let Some(message) = envelope.error {
                self.buffer.drain(..consumed);
                return Err(Error::Stream { message });
            }
            if !envelope.done {
                if let Some(content) = envelope.chunk {
                    events.push(StreamEvent::Chunk(content));
                }
            } else if let Some(code) = envelope.mermaid_code {
                self.final_code = Some(code.clone());
                events.push(StreamEvent::Completed(code));
            }
        }

        // Keep any incomplete tail for the next read.
        self.buffer.drain(..consumed);
        Ok(events)
    }

    pub fn final_code(&self) -> Option<&str> {
        self.final_code.as_deref()
    }

    /// Consumes the assembler once the transport signalled end-of-stream.
    /// A cancelled or incomplete stream yields `None`.
    pub fn finish(self) -> Option<String> {
        self.final_code
    }
}

/// Finds the next balanced `{...}` span at or after byte offset `from`,
/// tracking quoted strings so braces inside string literals never affect
/// the depth. Returns the byte offsets of the opening and closing braces.
pub fn find_json_object_end(text: &str, from: usize) -> Option<(usize, usize)> {
    if from >= text.len() {
        return None;
    }
    let open = from + text[from..].find('{')?;

    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaping = false;
    for (offset, &byte) in bytes[open + 1..].iter().enumerate() {
        if escaping {
            escaping = false;
            continue;
        }
        match byte {
            b'\\' if in_string => escaping = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, open + 1 + offset));
                }
            }
            _ => {}
        }
    }
    None
}

fn fenced_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:mermaid)?\s*(.*?)```").expect("valid regex"))
}

/// Content of the first fenced code block (optional `mermaid` tag), trimmed;
/// the raw text when no fence is present.
pub fn extract_fenced_code(text: &str) -> String {
    match fenced_code_regex().captures(text) {
        Some(caps) => caps[1].trim().to_string(),
        None => text.to_string(),
    }
}

/// Server-side accumulator for OpenAI-style `data:` lines.
///
/// Completed lines are parsed as they arrive; the partial tail is carried
/// across reads. A `[DONE]` sentinel is ignored, and a payload the
/// transport truncated gets one repair attempt before being skipped.
#[derive(Debug, Default)]
pub struct DeltaAccumulator {
    pending: String,
    text: String,
}

impl DeltaAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport read and returns the content deltas it completed.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.pending.push_str(chunk);

        let mut deltas = Vec::new();
        while let Some(idx) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=idx).collect();
            if let Some(content) = self.process_line(line.trim()) {
                deltas.push(content);
            }
        }
        deltas
    }

    /// The text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flushes any buffered partial line and returns the accumulated text
    /// with the first fenced code block extracted.
    pub fn into_final_code(mut self) -> String {
        let tail = std::mem::take(&mut self.pending);
        self.process_line(tail.trim());
        extract_fenced_code(&self.text)
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        let data = line.strip_prefix("data: ")?;
        if data == "[DONE]" || data.trim().is_empty() {
            return None;
        }

        let parsed: serde_json::Value = match serde_json::from_str(data) {
            Ok(value) => value,
            Err(_) => match repair_truncated_payload(data) {
                Some(value) => value,
                None => {
                    tracing::warn!("skipping malformed stream line");
                    return None;
                }
            },
        };

        let content = parsed
            .get("choices")?
            .get(0)?
            .get("delta")?
            .get("content")?
            .as_str()?;
        if content.is_empty() {
            return None;
        }
        self.text.push_str(content);
        Some(content.to_string())
    }
}

/// One repair attempt for a payload the transport cut short: a fixed
/// closing suffix is appended and the result re-parsed. Still-broken
/// payloads are skipped by the caller.
fn repair_truncated_payload(data: &str) -> Option<serde_json::Value> {
    if !data.contains(r#""choices":[{"index":"#) || data.ends_with("}]}") {
        return None;
    }
    let repaired = format!("{data}\"}}]}}]}}");
    match serde_json::from_str(&repaired) {
        Ok(value) => {
            tracing::debug!("repaired truncated stream payload");
            Some(value)
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_is_only_attempted_on_recognizable_payloads() {
        assert!(repair_truncated_payload("{\"foo\":1").is_none());
        // Complete payloads are never "repaired".
        assert!(repair_truncated_payload(r#"{"choices":[{"index":0,"delta":{}}]}"#).is_none());
    }

    #[test]
    fn repair_completes_a_compatible_truncation() {
        let truncated = r#"{"choices":[{"index":0,"messages":[{"content":"hi"#;
        let value = repair_truncated_payload(truncated).expect("repairs");
        assert_eq!(value["choices"][0]["messages"][0]["content"], "hi");
    }
}
