//! Scope document domain model.
//!
//! # Responsibility
//! - Define the canonical in-memory document and its item references.
//! - Define the theme preference stored alongside the document.
//!
//! # Invariants
//! - The in-memory model is the only source of truth; rendered output is not.

pub mod document;
pub mod theme;
