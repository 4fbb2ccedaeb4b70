//! Gazetteer data model, JSON loading and corpus-side construction.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use query_text::roman_match_norm;

use crate::GazetteerError;

/// Vocabulary of one metadata field.
///
/// `values` and `values_roman_norm` are parallel: index `i` of the roman list
/// is the match form of index `i` of the display list. Values are ordered
/// longest-first to enable greedy longest-match scanning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GazetteerField {
    pub values: Vec<String>,
    #[serde(default)]
    pub values_roman_norm: Vec<String>,
}

/// The full field -> vocabulary mapping.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Gazetteer {
    #[serde(flatten)]
    fields: BTreeMap<String, GazetteerField>,
}

impl Gazetteer {
    /// Loads a gazetteer JSON file produced by [`GazetteerBuilder`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GazetteerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GazetteerError::MissingFile(path.display().to_string()));
        }

        let raw = fs::read_to_string(path)?;
        let gaz: Gazetteer = serde_json::from_str(&raw)?;
        info!(
            "loaded gazetteer from {:?}: {}",
            path,
            gaz.fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v.values.len()))
                .collect::<Vec<_>>()
                .join(" ")
        );
        Ok(gaz)
    }

    pub fn field(&self, name: &str) -> Option<&GazetteerField> {
        self.fields.get(name)
    }

    pub fn to_json(&self) -> Result<String, GazetteerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds a gazetteer from corpus metadata values.
///
/// Values are uniqued, sorted longest-first (ties alphabetical) and paired
/// with their roman match forms.
#[derive(Default)]
pub struct GazetteerBuilder {
    fields: BTreeMap<String, BTreeSet<String>>,
}

impl GazetteerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds values for a field; empty and whitespace-only values are skipped.
    pub fn add_values<I, S>(&mut self, field: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.fields.entry(field.to_string()).or_default();
        for v in values {
            let v = v.as_ref().trim();
            if !v.is_empty() {
                set.insert(v.to_string());
            }
        }
        self
    }

    pub fn build(&self) -> Gazetteer {
        let mut fields = BTreeMap::new();
        for (name, set) in &self.fields {
            let mut values: Vec<String> = set.iter().cloned().collect();
            values.sort_by(|a, b| {
                b.chars()
                    .count()
                    .cmp(&a.chars().count())
                    .then_with(|| a.cmp(b))
            });
            let values_roman_norm = values.iter().map(|v| roman_match_norm(v)).collect();
            fields.insert(
                name.clone(),
                GazetteerField {
                    values,
                    values_roman_norm,
                },
            );
        }
        Gazetteer { fields }
    }
}
