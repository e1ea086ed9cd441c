pub mod search_response;

pub use search_response::{Hit, HitSource, Hits, SearchResponse};
