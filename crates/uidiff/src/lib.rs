#![forbid(unsafe_code)]

//! `uidiff` compares a UI design against what actually rendered, headlessly.
//!
//! Element boxes from both sides become semantic graphs, are paired per page zone, and are
//! diffed into a [`DiagnosticReport`]. With the `planner` feature each issue also gets a
//! [`planner::ModificationBlueprint`].
//!
//! # Features
//!
//! - `planner` (default): blueprint planning and the end-to-end pipeline (`uidiff::planner`)

pub use uidiff_core::*;

pub mod summary;

#[cfg(feature = "planner")]
pub mod planner;
