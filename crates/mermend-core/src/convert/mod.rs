//! Transpilers from dialects the renderer cannot consume into the
//! flowchart subset it reliably supports.
//!
//! Every converter is a deliberately lossy, best-effort transform: lines
//! that do not resolve are dropped rather than failing the conversion, and
//! notation the flowchart subset cannot express (ER cardinality, class
//! members) is discarded in favor of renderability.

mod class;
mod er;
mod group;
mod ids;
mod state;

pub use class::{convert_class_to_flowchart, is_er_shaped};
pub use er::convert_er_to_flowchart;
pub use group::{GrouperOptions, convert_long_flowchart_to_grouped, is_long_flowchart};
pub use ids::{format_entity_name, make_safe_node_id};
pub use state::convert_state_to_flowchart;

use crate::detect::Dialect;
use crate::{Error, Result};

// Insertion order is semantic here (node emission order, fallback edges),
// so the tables are index maps rather than hash maps.
pub(crate) type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
pub(crate) type FxIndexSet<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;

pub type ConverterFn = fn(source: &str) -> String;

#[derive(Debug, Clone)]
pub struct Converter {
    pub dialect: Dialect,
    pub convert: ConverterFn,
}

/// Dialect-keyed table of conversion functions.
#[derive(Debug, Clone)]
pub struct ConverterRegistry {
    converters: Vec<Converter>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self {
            converters: Vec::new(),
        }
    }

    pub fn add(&mut self, dialect: Dialect, convert: ConverterFn) {
        self.converters.push(Converter { dialect, convert });
    }

    pub fn default_converters() -> Self {
        let mut reg = Self::new();
        reg.add(Dialect::StateDiagram, convert_state_to_flowchart);
        reg.add(Dialect::ErDiagram, convert_er_to_flowchart);
        reg.add(Dialect::ClassDiagram, convert_class_to_flowchart);
        reg
    }

    pub fn get(&self, dialect: Dialect) -> Option<ConverterFn> {
        self.converters
            .iter()
            .find(|c| c.dialect == dialect)
            .map(|c| c.convert)
    }

    /// Transpiles `source` into flowchart-subset source, or reports that no
    /// converter is registered for `dialect`.
    pub fn convert(&self, dialect: Dialect, source: &str) -> Result<String> {
        let Some(convert) = self.get(dialect) else {
            return Err(Error::UnsupportedDialect { dialect });
        };
        Ok(convert(source))
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::default_converters()
    }
}
