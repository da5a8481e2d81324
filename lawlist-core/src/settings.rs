//! Persisted settings.
//!
//! Two shapes are accepted: the legacy `{"patterns": [..]}` holding ordered
//! patterns only, and the extended `{"ol_input": [..], "ul_input": [..],
//! "loop": bool}`. Missing keys take their defaults, `null` entries count as
//! blank.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    Error,
    level::{LevelMode, LevelResolver},
    table::{DEFAULT_LEVELS, PatternTable},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Legacy ordered patterns, used when `ol_input` is empty.
    #[serde(
        deserialize_with = "lenient_patterns",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub patterns: Vec<String>,
    #[serde(deserialize_with = "lenient_patterns")]
    pub ol_input: Vec<String>,
    #[serde(deserialize_with = "lenient_patterns")]
    pub ul_input: Vec<String>,
    #[serde(rename = "loop")]
    pub looping: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_levels: Option<usize>,
    pub level_mode: LevelMode,
}

impl Settings {
    /// Parse settings from their JSON form.
    ///
    /// # Errors
    ///
    /// [`Error::Settings`] when `json` is not a valid settings object.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize settings in the extended shape.
    ///
    /// # Errors
    ///
    /// [`Error::Settings`] if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The ordered patterns: `ol_input`, or the legacy `patterns` when that is empty.
    #[must_use]
    pub fn ordered_patterns(&self) -> &[String] {
        if self.ol_input.is_empty() {
            &self.patterns
        } else {
            &self.ol_input
        }
    }

    #[must_use]
    pub fn max_levels(&self) -> usize {
        self.max_levels.unwrap_or(DEFAULT_LEVELS)
    }

    /// Build the pattern table these settings describe.
    ///
    /// # Errors
    ///
    /// [`Error::LevelLimit`] when `max_levels` is out of range.
    pub fn pattern_table(&self) -> Result<PatternTable, Error> {
        PatternTable::new(
            self.ordered_patterns(),
            &self.ul_input,
            self.looping,
            self.max_levels(),
        )
    }

    /// A level resolver honoring `level_mode`.
    #[must_use]
    pub fn level_resolver(&self) -> LevelResolver {
        LevelResolver::builder().mode(self.level_mode).build()
    }
}

fn lenient_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}
