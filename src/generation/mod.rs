//! Randomized generation of slices, fixed systems and faction offers

pub mod anomaly;
pub mod factions;
pub mod fixed;
pub mod pools;
pub mod slices;

pub use anomaly::{adjacent_anomalies, separate_anomalies};
pub use factions::FactionGenerator;
pub use fixed::FixedSystemsGenerator;
pub use pools::{Requirement, SpecialTerrain, TierPools};
pub use slices::{GeneratedSlices, Slice, SliceGenerator, SliceTotals};
