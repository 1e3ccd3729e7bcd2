#![forbid(unsafe_code)]

//! Mermaid repair and dialect conversion for AI-generated diagram text.
//!
//! Design goals:
//! - maximal leniency: every entrypoint returns a best-effort string, and
//!   malformed input is repaired or degraded, never rejected
//! - deterministic, testable outputs
//! - runtime-agnostic async APIs (no specific executor required)
//!
//! The pipeline is: pre-clean → dialect detection → syntax repair →
//! dialect conversion. Dialects the flowchart subset cannot express are
//! transpiled ([`convert`]); text that is not diagram code at all comes
//! back as an [`Outcome::Explanation`] for display.

pub mod convert;
pub mod detect;
pub mod error;
pub mod repair;
pub mod sanitize;
pub mod stream;

pub use convert::{ConverterRegistry, GrouperOptions};
pub use detect::{Detector, DetectorRegistry, Dialect};
pub use error::{Error, Result};
pub use repair::clean_mermaid_code;
pub use sanitize::clean_text;
pub use stream::{
    DeltaAccumulator, JsonStreamAssembler, StreamEnvelope, StreamEvent, extract_fenced_code,
};

/// What the pipeline produced for one input string.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Outcome {
    /// Renderable flowchart-subset source: repaired, and transpiled when
    /// the input was another dialect.
    Flowchart { dialect: Dialect, code: String },
    /// A recognized dialect with no converter. Informational, not an
    /// error; `code` is preserved so the caller can still surface it.
    Unsupported { dialect: Dialect, code: String },
    /// Not diagram code; display the text to the user as an explanation.
    Explanation { text: String },
}

/// Pipeline tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Regroup oversized flat flowcharts (see [`GrouperOptions`]).
    pub group_long_flowcharts: bool,
    pub grouper: GrouperOptions,
}

#[derive(Debug, Clone)]
pub struct Engine {
    detectors: DetectorRegistry,
    converters: ConverterRegistry,
    options: PipelineOptions,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            detectors: DetectorRegistry::default_dialects(),
            converters: ConverterRegistry::default_converters(),
            options: PipelineOptions::default(),
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn detectors(&self) -> &DetectorRegistry {
        &self.detectors
    }

    pub fn detectors_mut(&mut self) -> &mut DetectorRegistry {
        &mut self.detectors
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub fn converters_mut(&mut self) -> &mut ConverterRegistry {
        &mut self.converters
    }

    /// Runs the full pipeline over one input string.
    ///
    /// Total over arbitrary input: malformed or non-diagram text comes back
    /// as [`Outcome::Explanation`], never as an error.
    pub fn process_sync(&self, input: &str) -> Outcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Outcome::Explanation {
                text: String::new(),
            };
        }

        let code = repair::preclean(trimmed);
        if !self.detectors.looks_like_diagram_code(&code) {
            return Outcome::Explanation {
                text: trimmed.to_string(),
            };
        }

        let dialect = self.detectors.detect(&code);
        match dialect {
            Dialect::Flowchart => {
                let mut code = repair::clean_mermaid_code(&code);
                if self.options.group_long_flowcharts
                    && convert::is_long_flowchart(&code, &self.options.grouper)
                {
                    code =
                        convert::convert_long_flowchart_to_grouped(&code, &self.options.grouper);
                }
                Outcome::Flowchart { dialect, code }
            }
            Dialect::StateDiagram | Dialect::ErDiagram | Dialect::ClassDiagram => {
                match self.converters.convert(dialect, &code) {
                    Ok(converted) => Outcome::Flowchart {
                        dialect,
                        code: converted,
                    },
                    // No table entry (e.g. removed by the caller): degrade
                    // to the informational notice.
                    Err(_) => Outcome::Unsupported { dialect, code },
                }
            }
            Dialect::Unknown => Outcome::Explanation {
                text: trimmed.to_string(),
            },
            _ => Outcome::Unsupported { dialect, code },
        }
    }

    pub async fn process(&self, input: &str) -> Outcome {
        self.process_sync(input)
    }
}

#[cfg(test)]
mod tests;
