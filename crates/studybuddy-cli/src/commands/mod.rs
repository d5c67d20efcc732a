//! Command implementations for studybuddy

pub mod ping;
pub mod submit;

pub use ping::ping;
pub use submit::{collect_fields, parse_field, submit};
