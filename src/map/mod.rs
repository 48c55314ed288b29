//! Hex map: coordinates, map indexing, assignments and seat geometry

pub mod assignment;
pub mod hex;
pub mod index;
pub mod seats;

pub use assignment::{MapAssignment, MapSlot};
pub use hex::{HexCoord, HEX_SIZE};
pub use seats::{SeatGeometry, StandardSeats};
