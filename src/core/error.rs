use thiserror::Error;

use crate::core::types::TileId;
use crate::map::assignment::MapSlot;
use crate::map::hex::HexCoord;

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Invalid hex format: {0}")]
    InvalidHexFormat(String),

    #[error("Invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("Infeasible constraints: {0}")]
    Infeasible(String),

    #[error("Generation failed after {attempts} attempts")]
    GenerationFailed { attempts: u32 },

    #[error("Insufficient factions: requested {requested}, only {available} available")]
    InsufficientFactions { requested: usize, available: usize },

    #[error("Hex collision at {hex}: {existing} already there, cannot place tile {incoming}")]
    HexCollision {
        hex: HexCoord,
        existing: MapSlot,
        incoming: TileId,
    },

    #[error("Unknown tile: {0}")]
    UnknownTile(TileId),

    #[error("Unknown faction: {0}")]
    UnknownFaction(String),

    #[error("Invalid seat: {0}")]
    InvalidSeat(usize),

    #[error("Invalid draft state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl DraftError {
    /// True when running generation again (or with looser constraints) may succeed.
    ///
    /// Everything else is either an input problem the caller must fix or a
    /// broken invariant that should halt the draft.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DraftError::GenerationFailed { .. })
    }
}

pub type Result<T> = std::result::Result<T, DraftError>;
