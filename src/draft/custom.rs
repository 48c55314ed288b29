//! Hand-written drafts from a custom configuration string
//!
//! `slices=19,20,21,22,23|24,25,26,27,28&factions=argent|arborec&fixed=..&labels=A|B`
//!
//! Slices and factions are separated by `|`, tiles by `,`. Every problem
//! found is reported; nothing stops at the first error.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::factions::FactionCatalog;
use crate::catalog::tiles::TileCatalog;
use crate::core::config::DraftConfig;
use crate::core::types::TileId;
use crate::generation::slices::Slice;

/// A draft whose slices (and optionally factions and fixed systems) were
/// chosen by hand
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDraft {
    pub slices: Vec<Slice>,
    /// Empty when factions should be generated
    pub factions: Vec<String>,
    /// Empty when fixed systems should be generated
    pub fixed: Vec<TileId>,
    /// Display names per slice; empty for default labels
    pub labels: Vec<String>,
}

fn parse_tiles(value: &str, what: &str, errors: &mut Vec<String>) -> Vec<TileId> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|token| match token.parse::<u32>() {
            Ok(id) => Some(TileId(id)),
            Err(_) => {
                errors.push(format!("{}: \"{}\" is not a tile number", what, token));
                None
            }
        })
        .collect()
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl CustomDraft {
    /// Parse the string form; syntax problems only
    pub fn parse(input: &str) -> Result<Self, Vec<String>> {
        let mut draft = CustomDraft::default();
        let mut errors = Vec::new();
        let mut seen_keys: Vec<&str> = Vec::new();

        for part in input.trim().split('&').filter(|p| !p.trim().is_empty()) {
            let Some((key, value)) = part.split_once('=') else {
                errors.push(format!("\"{}\" is not key=value", part));
                continue;
            };
            let key = key.trim();
            if seen_keys.contains(&key) {
                errors.push(format!("{} given more than once", key));
                continue;
            }
            seen_keys.push(key);

            match key {
                "slices" => {
                    draft.slices = value
                        .split('|')
                        .enumerate()
                        .map(|(i, s)| {
                            Slice::new(parse_tiles(s, &format!("slice {}", i + 1), &mut errors))
                        })
                        .collect();
                }
                "factions" => draft.factions = parse_list(value),
                "fixed" => draft.fixed = parse_tiles(value, "fixed", &mut errors),
                "labels" => draft.labels = parse_list(value),
                other => errors.push(format!("unknown key \"{}\"", other)),
            }
        }

        if draft.slices.is_empty() && !seen_keys.contains(&"slices") {
            errors.push("missing slices".into());
        }

        if errors.is_empty() {
            Ok(draft)
        } else {
            Err(errors)
        }
    }

    /// Check against the catalogs and the draft configuration
    pub fn validate(
        &self,
        tiles: &dyn TileCatalog,
        factions: &FactionCatalog,
        config: &DraftConfig,
    ) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let body_len = config.variant.shape_kind().shape().body_len();

        if self.slices.len() < config.player_count {
            errors.push(format!(
                "{} slices for {} players",
                self.slices.len(),
                config.player_count
            ));
        }

        let mut used = AHashSet::new();
        for (i, slice) in self.slices.iter().enumerate() {
            if slice.len() != body_len {
                errors.push(format!(
                    "slice {} has {} tiles, expected {}",
                    i + 1,
                    slice.len(),
                    body_len
                ));
            }
            for &tile in slice.tiles() {
                if tiles.tile(tile).is_none() {
                    errors.push(format!("slice {}: unknown tile {}", i + 1, tile));
                }
                if !used.insert(tile) {
                    errors.push(format!("tile {} used more than once", tile));
                }
            }
        }

        if !self.fixed.is_empty() {
            let expected = config.fixed_count();
            if self.fixed.len() != expected {
                errors.push(format!(
                    "{} fixed systems given, {} needs {}",
                    self.fixed.len(),
                    config.variant.name(),
                    expected
                ));
            }
            for &tile in &self.fixed {
                if tiles.tile(tile).is_none() {
                    errors.push(format!("fixed: unknown tile {}", tile));
                }
                if !used.insert(tile) {
                    errors.push(format!("tile {} used more than once", tile));
                }
            }
        }

        if !self.labels.is_empty() && self.labels.len() != self.slices.len() {
            errors.push(format!(
                "{} labels for {} slices",
                self.labels.len(),
                self.slices.len()
            ));
        }

        if !self.factions.is_empty() {
            let mut listed = Vec::with_capacity(self.factions.len());
            for nsid in &self.factions {
                match factions.get(nsid) {
                    Some(info) => listed.push(info),
                    None => errors.push(format!("unknown faction \"{}\"", nsid)),
                }
            }
            for (i, a) in listed.iter().enumerate() {
                for b in &listed[i + 1..] {
                    let conflict = a.conflicts_with.as_deref() == Some(b.nsid.as_str())
                        || b.conflicts_with.as_deref() == Some(a.nsid.as_str());
                    let same_umbrella = a.umbrella.is_some() && a.umbrella == b.umbrella;
                    if a.nsid == b.nsid {
                        errors.push(format!("faction {} listed more than once", a.nsid));
                    } else if conflict || same_umbrella {
                        errors.push(format!(
                            "factions {} and {} cannot both be offered",
                            a.nsid, b.nsid
                        ));
                    }
                }
            }
            if self.factions.len() < config.player_count {
                errors.push(format!(
                    "{} factions for {} players",
                    self.factions.len(),
                    config.player_count
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Label of slice `index`, falling back to its letter
    pub fn label(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| default_label(index))
    }
}

impl FromStr for CustomDraft {
    type Err = Vec<String>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// "A", "B", ... for slice indices
pub fn default_label(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => (index + 1).to_string(),
    }
}
