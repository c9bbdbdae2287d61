#![forbid(unsafe_code)]

//! Modification blueprints for diagnostic reports (headless).
//!
//! Each issue of a [`uidiff_core::DiagnosticReport`] is turned into a
//! [`ModificationBlueprint`]: a structured suggestion of which file to touch and how. An
//! external generator (typically an LLM agent behind [`CompletionClient`]) is asked first;
//! when it is absent or fails, a conservative rule-based plan is produced instead.

pub mod blueprint;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod planner;
pub mod prompt;
pub mod search;

pub use blueprint::{ActionType, Confidence, LocationHint, ModificationBlueprint};
pub use error::{Error, Result};
pub use generator::{AgentGenerator, BlueprintGenerator, CompletionClient, PlanRequest};
pub use planner::Planner;
