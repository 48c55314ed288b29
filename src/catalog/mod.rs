//! Tile and faction catalogs supplied to the generators

pub mod factions;
pub mod tiles;

pub use factions::{FactionCatalog, FactionInfo};
pub use tiles::{optimal_values, StandardTileCatalog, TileCatalog, TileInfo};
