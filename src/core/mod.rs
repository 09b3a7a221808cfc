pub mod cleanup;
pub mod date_cursor;
pub mod digest;
pub mod engine;
pub mod menu_parser;
pub mod preferences;
