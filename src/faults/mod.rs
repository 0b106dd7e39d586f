//! Fault injection subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → injector.rs (sample delay, sleep, roll for failure)
//!     → random.rs (uniform samples in [0, 1))
//! ```
//!
//! # Design Decisions
//! - Randomness sits behind a trait so tests can force either branch
//! - Sleeps are Tokio timers; other requests keep running meanwhile
//! - Profiles come from configuration; defaults mirror the demo literals

pub mod injector;
pub mod random;

pub use injector::FaultInjector;
pub use random::{FixedRandom, RandomSource, SeededRandom, ThreadRandom};
