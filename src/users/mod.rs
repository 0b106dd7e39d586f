//! User dataset subsystem.
//!
//! # Data Flow
//! ```text
//! process start
//!     → store.rs (fixed, ordered sequence of three records)
//!     → shared via Arc to every handler
//!     → read-only lookups for the lifetime of the process
//! ```
//!
//! # Design Decisions
//! - No persistence and no mutation endpoints
//! - Identifiers are unique within the sequence

pub mod store;

pub use store::{User, UserStore};
