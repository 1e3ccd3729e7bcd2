use regex::Regex;
use std::sync::OnceLock;

/// Mermaid dialect of a source string, keyed by the statement keyword on the
/// first non-empty line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Flowchart,
    SequenceDiagram,
    ClassDiagram,
    StateDiagram,
    ErDiagram,
    Gantt,
    Pie,
    Journey,
    Unknown,
}

impl Dialect {
    /// The keyword that introduces this dialect. The legacy `graph` spelling
    /// also maps to [`Dialect::Flowchart`].
    pub fn keyword(self) -> &'static str {
        match self {
            Dialect::Flowchart => "flowchart",
            Dialect::SequenceDiagram => "sequenceDiagram",
            Dialect::ClassDiagram => "classDiagram",
            Dialect::StateDiagram => "stateDiagram",
            Dialect::ErDiagram => "erDiagram",
            Dialect::Gantt => "gantt",
            Dialect::Pie => "pie",
            Dialect::Journey => "journey",
            Dialect::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

impl serde::Serialize for Dialect {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.keyword())
    }
}

pub type DetectorFn = fn(line: &str) -> bool;

#[derive(Debug, Clone)]
pub struct Detector {
    pub dialect: Dialect,
    pub detector: DetectorFn,
}

/// Ordered table of dialect detectors, applied to the first non-empty line
/// of a trimmed source.
#[derive(Debug, Clone)]
pub struct DetectorRegistry {
    detectors: Vec<Detector>,
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    pub fn add(&mut self, dialect: Dialect, detector: DetectorFn) {
        self.detectors.push(Detector { dialect, detector });
    }

    /// The detector order is significant: `graph`/`flowchart` come first so
    /// that a flowchart whose labels mention another keyword is not
    /// misclassified.
    pub fn default_dialects() -> Self {
        let mut reg = Self::new();
        reg.add(Dialect::Flowchart, detector_graph);
        reg.add(Dialect::Flowchart, detector_flowchart);
        reg.add(Dialect::SequenceDiagram, detector_sequence);
        reg.add(Dialect::ClassDiagram, detector_class);
        reg.add(Dialect::StateDiagram, detector_state);
        reg.add(Dialect::ErDiagram, detector_er);
        reg.add(Dialect::Gantt, detector_gantt);
        reg.add(Dialect::Pie, detector_pie);
        reg.add(Dialect::Journey, detector_journey);
        reg
    }

    /// Classifies `source` by its first non-empty line. Returns
    /// [`Dialect::Unknown`] when no detector matches; callers must treat that
    /// as "display the raw text to the user", never as diagram input.
    pub fn detect(&self, source: &str) -> Dialect {
        let Some(first_line) = first_nonempty_line(source) else {
            return Dialect::Unknown;
        };

        for det in &self.detectors {
            if (det.detector)(first_line) {
                return det.dialect;
            }
        }

        // `flowchart`/`graph` followed by a direction token also counts,
        // matched as a pattern rather than a bare prefix.
        if flowchart_with_direction_regex().is_match(first_line) {
            return Dialect::Flowchart;
        }

        Dialect::Unknown
    }

    /// Guards against treating natural-language AI commentary as diagram
    /// code. Prose markers (CJK punctuation, a long single-line blob) reject
    /// outright; flowchart-family text must additionally show structural
    /// evidence: an edge marker plus a node definition, a `subgraph`, or a
    /// `%%` comment.
    pub fn looks_like_diagram_code(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        if cjk_punctuation_regex().is_match(trimmed) {
            return false;
        }
        if !trimmed.contains('\n') && trimmed.chars().count() > 100 {
            return false;
        }

        match self.detect(trimmed) {
            Dialect::Unknown => false,
            Dialect::Flowchart => {
                let has_edge = trimmed.contains("-->")
                    || trimmed.contains("->")
                    || trimmed.contains("==>");
                let has_structure = node_definition_regex().is_match(trimmed)
                    || trimmed.contains("subgraph")
                    || trimmed.contains("%%");
                has_edge && has_structure
            }
            _ => true,
        }
    }
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::default_dialects()
    }
}

fn first_nonempty_line(source: &str) -> Option<&str> {
    source.lines().map(str::trim).find(|line| !line.is_empty())
}

fn flowchart_with_direction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:flowchart|graph)\s+(?:TD|TB|LR|RL|BT)\b").expect("valid regex")
    })
}

fn cjk_punctuation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[，。；：？！「」『』（）【】]").expect("valid regex"))
}

fn node_definition_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\w+\s*\[.*\]").expect("valid regex"))
}

fn detector_graph(line: &str) -> bool {
    line.starts_with("graph")
}

fn detector_flowchart(line: &str) -> bool {
    line.starts_with("flowchart")
}

fn detector_sequence(line: &str) -> bool {
    line.starts_with("sequenceDiagram")
}

fn detector_class(line: &str) -> bool {
    line.starts_with("classDiagram")
}

fn detector_state(line: &str) -> bool {
    line.starts_with("stateDiagram")
}

fn detector_er(line: &str) -> bool {
    line.starts_with("erDiagram")
}

fn detector_gantt(line: &str) -> bool {
    line.starts_with("gantt")
}

fn detector_pie(line: &str) -> bool {
    line.starts_with("pie")
}

fn detector_journey(line: &str) -> bool {
    line.starts_with("journey")
}
