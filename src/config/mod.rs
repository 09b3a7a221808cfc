#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;
pub mod users;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::DigestConfig;
pub use users::load_users;
