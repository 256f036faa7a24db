use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use thiserror::Error;

const EMBEDDED_CATALOG: &str = include_str!("../data/majors.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid \"major_name\": \"{name}\". When major level is {level}, the major does not exist.")]
    NotFound { name: String, level: MajorLevel },
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Degree level a major is offered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum MajorLevel {
    #[serde(rename = "本科")]
    Undergraduate,
    #[serde(rename = "专科")]
    Associate,
}

impl MajorLevel {
    /// Level code used by the catalog's `level1` field.
    pub fn code(self) -> &'static str {
        match self {
            MajorLevel::Undergraduate => "1",
            MajorLevel::Associate => "2",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(MajorLevel::Undergraduate),
            "2" => Some(MajorLevel::Associate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MajorLevel::Undergraduate => "本科",
            MajorLevel::Associate => "专科",
        }
    }
}

impl fmt::Display for MajorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MajorEntry {
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "level3_name", default)]
    pub alternate_name: String,
    #[serde(rename = "level1", deserialize_with = "level_from_code")]
    pub level: MajorLevel,
    #[serde(rename = "special_id", deserialize_with = "id_from_string_or_number")]
    pub canonical_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMajor {
    pub canonical_id: String,
}

/// Read-only name to identifier table, loaded once at startup.
#[derive(Debug, Clone)]
pub struct MajorCatalog {
    entries: Vec<MajorEntry>,
}

impl MajorCatalog {
    pub fn new(entries: Vec<MajorEntry>) -> Self {
        Self { entries }
    }

    /// Catalog bundled with the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let entries: Vec<MajorEntry> = serde_json::from_str(content)?;
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn entries(&self) -> &[MajorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a free-text major name to its canonical identifier.
    ///
    /// Entries of the requested level are scanned in catalog order, first by
    /// display name and then by alternate name; the first entry containing
    /// `name` as a substring wins, even when later entries would match too.
    pub fn resolve(&self, name: &str, level: MajorLevel) -> Result<ResolvedMajor, CatalogError> {
        let at_level = || self.entries.iter().filter(move |e| e.level == level);

        at_level()
            .find(|e| e.display_name.contains(name))
            .or_else(|| at_level().find(|e| e.alternate_name.contains(name)))
            .map(|e| ResolvedMajor {
                canonical_id: e.canonical_id.clone(),
            })
            .ok_or_else(|| CatalogError::NotFound {
                name: name.to_string(),
                level,
            })
    }
}

fn level_from_code<'de, D>(deserializer: D) -> Result<MajorLevel, D::Error>
where
    D: Deserializer<'de>,
{
    let code = String::deserialize(deserializer)?;
    MajorLevel::from_code(&code)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown level code: {}", code)))
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "special_id must be a string or number, got {}",
            other
        ))),
    }
}
