//! # Domain Models
//!
//! This crate contains pure data types with minimal dependencies (`serde`, `serde_json`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.

pub mod config;
pub mod envelope;
pub mod exchange;
pub mod properties;

pub use envelope::{Envelope, Status};
pub use exchange::{Request, Response};
pub use properties::{Properties, merge};
