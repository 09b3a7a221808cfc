pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileCheckpointStore, HttpMenuFetcher, SmtpMailer};
pub use config::DigestConfig;
pub use core::engine::{DigestEngine, RunMode, RunOutcome, RunSettings};
pub use utils::error::{DigestError, Result};
