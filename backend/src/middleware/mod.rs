//! Request middleware.
//!
//! Purpose: attach a trace identifier to every request and log its outcome.

pub mod trace;

pub use trace::Trace;
