//! # Swrr
//!
//! Smooth weighted round-robin selection for Rust services.
//!
//! Given a static set of weighted candidates (backend hosts, shards, workers),
//! the selector picks one candidate per call so that over any long run each
//! candidate is chosen with frequency proportional to its weight, and picks of
//! the same candidate are spread evenly across a cycle rather than clustered.
//!
//! ## Architecture
//!
//! The crate is organized into the following layers:
//!
//! - **Candidate Layer**: candidate and weight-configuration types, validation
//! - **Selector Layer**: the smooth weighted round-robin algorithm and its state
//! - **Config Layer**: TOML weight-table loading
//!
//! ## Quick Start
//!
//! ```rust
//! use swrr::{Candidate, SmoothWeight};
//!
//! let selector = SmoothWeight::with_candidates(vec![
//!     Candidate::new("a", 2),
//!     Candidate::new("b", 1),
//! ]).unwrap();
//!
//! assert_eq!(selector.next().unwrap(), "a");
//! assert_eq!(selector.next().unwrap(), "b");
//! assert_eq!(selector.next().unwrap(), "a");
//! ```

pub mod candidate;
pub mod config;
pub mod logger;
pub mod selector;

// Re-export commonly used types
pub use candidate::{Candidate, WeightConfig};
pub use selector::{SmoothWeight, WeightState};

/// Error types for the swrr crate
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum SwrrError {
        #[error("Configuration error: {0}")]
        Config(String),

        #[error("No active configuration")]
        NotConfigured,

        #[error("Io error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Configuration parse error: {0}")]
        Parse(#[from] toml::de::Error),
    }

    pub type Result<T> = std::result::Result<T, SwrrError>;
}

pub use error::{Result, SwrrError};

/// Constants used throughout the crate
pub mod consts {
    /// Weight assigned to a candidate when the weight table omits one
    pub const DEFAULT_WEIGHT: u32 = 1;

    /// Largest weight the config loader accepts for a single candidate
    pub const MAX_WEIGHT: i64 = u32::MAX as i64;
}
