//! Shared test utilities for inkpress integration tests.
//!
//! This module provides:
//! - Listener doubles that record or reject hub events
//! - A recording `ProgressReporter`
//! - Collaborator fakes for the generation pipeline

#![allow(dead_code)]

pub mod fakes;
pub mod listeners;

pub use fakes::*;
pub use listeners::*;
