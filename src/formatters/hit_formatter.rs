use super::highlight::Highlighter;
use crate::error::TailError;
use crate::schemas::{Hit, SearchResponse};
use colored::Colorize;

/// How hits are turned into terminal lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub search_host: bool,
    pub highlight: bool,
}

#[derive(Debug, Clone)]
pub struct HitFormatter {
    search_host: bool,
    highlighter: Option<Highlighter>,
}

impl HitFormatter {
    /// The highlight pattern is compiled here, so a bad query fails before
    /// the first request is sent.
    pub fn new(options: RenderOptions, query: &str) -> Result<Self, TailError> {
        let highlighter = if options.highlight {
            Some(Highlighter::new(query)?)
        } else {
            None
        };

        Ok(Self {
            search_host: options.search_host,
            highlighter,
        })
    }

    pub fn format_hit(&self, hit: &Hit) -> Result<Vec<String>, TailError> {
        let line = if self.search_host {
            let host = hit.source.host.as_deref().ok_or(TailError::MissingHost)?;
            format!("{} {}", host.cyan().on_black(), hit.source.message)
        } else {
            hit.source.message.clone()
        };

        Ok(match &self.highlighter {
            Some(highlighter) => highlighter.highlight(&line),
            None => vec![line],
        })
    }

    /// All lines for a response. Nothing is returned unless every hit formats.
    pub fn format_response(&self, response: SearchResponse) -> Result<Vec<String>, TailError> {
        let mut lines = Vec::new();
        for hit in response.into_hits()? {
            lines.extend(self.format_hit(&hit)?);
        }
        Ok(lines)
    }
}
