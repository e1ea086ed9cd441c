pub mod highlight;
pub mod hit_formatter;

pub use highlight::Highlighter;
pub use hit_formatter::{HitFormatter, RenderOptions};

#[cfg(test)]
pub(crate) fn strip_ansi(text: &str) -> String {
    let escapes = regex::Regex::new("\u{1b}\\[[0-9;]*m").unwrap();
    escapes.replace_all(text, "").into_owned()
}
