use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const EMBEDDED_HEADERS: &str = include_str!("../data/headers.json");

#[derive(Debug, Error)]
pub enum HeaderPoolError {
    #[error("failed to read header pool: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse header pool: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("header pool is empty")]
    Empty,
}

/// One browser-like set of request headers.
pub type HeaderSet = BTreeMap<String, String>;

/// Non-empty pool of header sets; every outbound request picks one at random.
#[derive(Debug, Clone)]
pub struct HeaderPool {
    sets: Vec<HeaderSet>,
}

impl HeaderPool {
    pub fn new(sets: Vec<HeaderSet>) -> Result<Self, HeaderPoolError> {
        if sets.is_empty() {
            return Err(HeaderPoolError::Empty);
        }
        Ok(Self { sets })
    }

    pub fn embedded() -> Result<Self, HeaderPoolError> {
        Self::from_json(EMBEDDED_HEADERS)
    }

    pub fn from_json(content: &str) -> Result<Self, HeaderPoolError> {
        Self::new(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, HeaderPoolError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn sets(&self) -> &[HeaderSet] {
        &self.sets
    }

    /// Uniform pick with replacement. Calls are independent.
    pub fn select(&self) -> &HeaderSet {
        let index = rand::thread_rng().gen_range(0..self.sets.len());
        &self.sets[index]
    }
}
