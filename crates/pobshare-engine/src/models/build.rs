use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Item;

/// A decoded build: the whole queryable representation downstream
/// consumers (comparison, upgrade advice, AI context) work from.
///
/// Constructed once per decode and handed over as plain owned data. All
/// maps are ordered so that identical input always produces an
/// observably identical build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub class_name: String,
    pub ascendancy: String,
    /// Character level, at least 1.
    pub level: u32,
    /// Bandit quest choice, "None" when not declared.
    pub bandit: String,
    /// Label of the main skill as declared in the document header.
    pub main_skill: String,
    /// One item per equipment slot, keyed by slot name.
    pub items: BTreeMap<String, Item>,
    /// Skill labels in document order.
    pub skills: Vec<String>,
    /// Configuration flags, values stringified from whichever typed
    /// attribute the document carried.
    pub config: BTreeMap<String, String>,
    /// Numeric player stats (only entries whose value parsed).
    pub stats: BTreeMap<String, f64>,
}

impl Default for Build {
    fn default() -> Self {
        Self {
            class_name: String::new(),
            ascendancy: String::new(),
            level: 1,
            bandit: "None".to_string(),
            main_skill: String::new(),
            items: BTreeMap::new(),
            skills: Vec::new(),
            config: BTreeMap::new(),
            stats: BTreeMap::new(),
        }
    }
}
