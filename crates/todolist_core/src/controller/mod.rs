//! View-model layer that the UI shell binds to.
//!
//! # Responsibility
//! - Cache store state for rendering and turn user intents into store calls.
//! - Absorb persistence failures so the presentation never sees an error.

pub mod list_controller;
