//! Repository data model.
//!
//! # Responsibility
//! - Describe repository identity and the layers written at bootstrap.
//! - Name the columns and values the container writes for them.
//!
//! # Invariants
//! - Repository metadata is immutable once constructed.
//! - The default layer set is process-constant.

pub mod default_layers;
pub mod repository;
