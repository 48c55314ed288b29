//! Slice Draft - balanced slice, faction and map generation for hex-grid drafts

pub mod catalog;
pub mod core;
pub mod draft;
pub mod generation;
pub mod layout;
pub mod map;
