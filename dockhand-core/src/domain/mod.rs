//! Core domain types
//!
//! Everything here is computed, never stored: a status snapshot lives for
//! one refresh cycle and is replaced wholesale by the next one.

pub mod lifecycle;
pub mod status;
