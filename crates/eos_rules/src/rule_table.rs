//! Externally supplied per-type movement and attack distances.
//!
//! The table is loaded once (TOML or JSON) and then shared immutably by every
//! game that uses it. The engine never computes these numbers.

use crate::types::{PieceType, base_type_name};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

const STANDARD_RULES: &str = include_str!("../rules/default_rules.toml");

/// Movement and attack distances for one piece type.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters, derive_new::new)]
pub struct RuleEntry {
    /// Distances a normal move may cover.
    move_steps: BTreeSet<u32>,
    /// Distances at which the piece can capture.
    attack_range: BTreeSet<u32>,
    /// Distances of the one follow-up move allowed after a capture.
    mandatory_move: BTreeSet<u32>,
    /// Free-form attack style from the source table ("melee", "ranged", ...).
    attack_kind: Option<String>,
}

impl RuleEntry {
    /// Convenience constructor from distance slices.
    pub fn from_distances(move_steps: &[u32], attack_range: &[u32], mandatory_move: &[u32]) -> Self {
        Self {
            move_steps: move_steps.iter().copied().collect(),
            attack_range: attack_range.iter().copied().collect(),
            mandatory_move: mandatory_move.iter().copied().collect(),
            attack_kind: None,
        }
    }

    /// Entry used when a type has no row in the table: single-step moves,
    /// no attacks, no mandatory move.
    pub fn fallback() -> Self {
        Self::from_distances(&[1], &[], &[])
    }

    /// Largest normal move distance, or 0 if the piece cannot move normally.
    pub fn max_step(&self) -> u32 {
        self.move_steps.last().copied().unwrap_or(0)
    }
}

/// Rule table load failure.
#[derive(Debug, Clone, Display, Error)]
#[display("Rule table error: {} at {}:{}", message, file, line)]
pub struct RuleTableError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl RuleTableError {
    /// Creates a new rule table error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Raw row as it appears in the external table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawRuleEntry {
    #[serde(default)]
    move_steps: Vec<u32>,
    #[serde(default)]
    attack_rules: RawAttackRules,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawAttackRules {
    #[serde(default)]
    range: Vec<u32>,
    #[serde(default)]
    mandatory_move: OneOrMany,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// `mandatory_move` is either a single distance or a list of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(u32),
    Many(Vec<u32>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl OneOrMany {
    fn into_set(self) -> BTreeSet<u32> {
        match self {
            OneOrMany::One(0) => BTreeSet::new(),
            OneOrMany::One(n) => BTreeSet::from([n]),
            OneOrMany::Many(v) => v.into_iter().collect(),
        }
    }
}

fn positive(name: &str, field: &str, values: BTreeSet<u32>) -> BTreeSet<u32> {
    if values.contains(&0) {
        warn!(piece = name, field, "Ignoring zero distance in rule table");
    }
    values.into_iter().filter(|&d| d > 0).collect()
}

impl RawRuleEntry {
    fn into_entry(self, name: &str) -> RuleEntry {
        RuleEntry {
            move_steps: positive(name, "move_steps", self.move_steps.into_iter().collect()),
            attack_range: positive(name, "range", self.attack_rules.range.into_iter().collect()),
            mandatory_move: positive(
                name,
                "mandatory_move",
                self.attack_rules.mandatory_move.into_set(),
            ),
            attack_kind: self.attack_rules.kind,
        }
    }
}

/// Immutable per-type rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    entries: HashMap<PieceType, RuleEntry>,
    fallback: RuleEntry,
}

impl RuleTable {
    /// Builds a table directly from entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (PieceType, RuleEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            fallback: RuleEntry::fallback(),
        }
    }

    /// The table shipped with the engine.
    #[instrument]
    pub fn standard() -> Result<Self, RuleTableError> {
        Self::from_toml_str(STANDARD_RULES)
    }

    /// Parses a TOML table keyed by piece-type name.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, RuleTableError> {
        let raw: BTreeMap<String, RawRuleEntry> = toml::from_str(content)
            .map_err(|e| RuleTableError::new(format!("Failed to parse rule table: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Parses a JSON table keyed by piece-type name.
    #[instrument(skip(content))]
    pub fn from_json_str(content: &str) -> Result<Self, RuleTableError> {
        let raw: BTreeMap<String, RawRuleEntry> = serde_json::from_str(content)
            .map_err(|e| RuleTableError::new(format!("Failed to parse rule table: {}", e)))?;
        Self::from_raw(raw)
    }

    /// Loads a table from disk; `.json` files are read as JSON, anything else as TOML.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        debug!("Loading rule table from file");
        let content = std::fs::read_to_string(path)
            .map_err(|e| RuleTableError::new(format!("Failed to read rule table: {}", e)))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    fn from_raw(raw: BTreeMap<String, RawRuleEntry>) -> Result<Self, RuleTableError> {
        let mut entries: HashMap<PieceType, RuleEntry> = HashMap::new();
        for (name, raw_entry) in raw {
            let Some(piece_type) = PieceType::from_name(&name) else {
                warn!(name = %name, base = base_type_name(&name), "Skipping unknown piece type in rule table");
                continue;
            };
            let entry = raw_entry.into_entry(&name);
            match entries.get(&piece_type) {
                Some(existing) if *existing != entry => {
                    return Err(RuleTableError::new(format!(
                        "Conflicting rule entries for {} (from key {:?})",
                        piece_type, name
                    )));
                }
                Some(_) => debug!(name = %name, "Duplicate identical rule entry"),
                None => {
                    entries.insert(piece_type, entry);
                }
            }
        }
        info!(types = entries.len(), "Rule table loaded");
        Ok(Self {
            entries,
            fallback: RuleEntry::fallback(),
        })
    }

    /// The entry for `piece_type`, if the table has one.
    pub fn entry(&self, piece_type: PieceType) -> Option<&RuleEntry> {
        self.entries.get(&piece_type)
    }

    /// The entry for `piece_type`, degrading to [`RuleEntry::fallback`] when missing.
    pub fn resolve(&self, piece_type: PieceType) -> &RuleEntry {
        match self.entries.get(&piece_type) {
            Some(entry) => entry,
            None => {
                debug!(piece = %piece_type, "Missing rule entry; using single-step fallback");
                &self.fallback
            }
        }
    }

    /// Piece types with no entry in this table.
    pub fn missing_types(&self) -> Vec<PieceType> {
        <PieceType as strum::IntoEnumIterator>::iter()
            .filter(|ty| !self.entries.contains_key(ty))
            .collect()
    }
}
