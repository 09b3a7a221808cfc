pub mod error;
pub mod logger;
pub mod selector;
pub mod validation;
