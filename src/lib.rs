pub mod error;
pub mod formatters;
pub mod logging;
pub mod query;
pub mod schemas;
pub mod search;
pub mod settings;
pub mod window;

pub use error::TailError;
pub use formatters::{Highlighter, HitFormatter, RenderOptions};
pub use query::SearchRequest;
pub use schemas::{Hit, HitSource, SearchResponse};
pub use search::{HttpSearchClient, RetryPolicy, SearchBackend, SearchRunner, tail};
pub use settings::{ConfigSources, SettingsOverrides, TailConfig};
pub use window::{PollWindow, WindowTracker};
