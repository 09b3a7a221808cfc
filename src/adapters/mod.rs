// Adapters layer: concrete implementations of the domain ports.

pub mod checkpoint;
pub mod http;
pub mod mailer;

pub use checkpoint::FileCheckpointStore;
pub use http::HttpMenuFetcher;
pub use mailer::{SmtpMailer, SmtpSettings};
