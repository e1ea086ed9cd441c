pub mod pattern;
pub mod request;

pub use pattern::{compile_highlight_pattern, first_token};
pub use request::SearchRequest;
