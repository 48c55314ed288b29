//! Slice shapes and their placement on the map

pub mod shape;
pub mod slice_layout;

pub use shape::{SeatOverride, ShapeKind, ShapeTable, SliceShape};
pub use slice_layout::{place_offset, place_shape, PlayerSlice, SliceLayout};
