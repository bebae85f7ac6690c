//! Mock generation for Go projects.
//!
//! Resolves where the mock for each configured package lives, drives a
//! [`MockBackend`] to produce the mock sources, and reconciles mock trees
//! against the configured set of packages.
//!
//! # Module Organization
//!
//! - [`context`] - Project-wide settings the resolver needs
//! - [`destination`] - Resolved destinations and their derived views
//! - [`resolve`] - Package path to destination resolution
//! - [`backend`] - Mock body generators (`mockgen` and in-process)
//! - [`generate`] - Generation orchestration
//! - [`tidy`] - Mock tree reconciliation

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod backend;
pub mod context;
pub mod destination;
mod error;
pub mod generate;
mod helpers;
pub mod resolve;
pub mod tidy;

pub use backend::{BackendError, GenerateRequest, MockBackend, MockgenBackend, NativeBackend};
pub use context::ProjectContext;
pub use destination::{Destination, DestinationSet};
pub use error::{ConfigError, Error, GenerationFailure, Result};
pub use generate::{GenerateSummary, GeneratedMock, MockGenerator};
pub use resolve::{resolve, resolve_config};
pub use tidy::{TidyPlan, TidySummary};
