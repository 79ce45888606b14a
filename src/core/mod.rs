//! Core domain types for accessibility labeling
//!
//! This module contains the label derivations and the attribute/class
//! vocabulary, with zero external dependencies. Everything here is pure and
//! independent of any concrete tree implementation.

pub mod attrs;
mod label;

pub use label::{BLANK_LABEL, derive_composite_label, derive_tile_label};
