use crate::error::TailError;
use crate::query::compile_highlight_pattern;
use colored::Colorize;
use regex::Regex;

/// Recolors the words of a line that match the first word of the query.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Regex,
}

impl Highlighter {
    pub fn new(query: &str) -> Result<Self, TailError> {
        Ok(Self {
            pattern: compile_highlight_pattern(query)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// One output line per matching word, each with only that word colored.
    ///
    /// A line with no matching word yields nothing, so highlight mode drops
    /// lines the first query word does not appear in.
    pub fn highlight(&self, line: &str) -> Vec<String> {
        let words: Vec<&str> = line.split_whitespace().collect();

        words
            .iter()
            .enumerate()
            .filter(|(_, word)| self.pattern.is_match(word))
            .map(|(i, word)| {
                let marked = word.yellow().on_black().to_string();
                words[..i]
                    .iter()
                    .copied()
                    .chain(std::iter::once(marked.as_str()))
                    .chain(words[i + 1..].iter().copied())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}
