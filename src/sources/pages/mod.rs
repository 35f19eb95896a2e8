//! Extraction rules for the supported chart and radio history pages.

mod billboard;
mod odsluchane;
mod uk_singles;

pub use billboard::{Billboard, BillboardCharts};
pub use odsluchane::Odsluchane;
pub use uk_singles::UkSingles;

/// Text between `prefix` and the next `end` in `text`.
fn between<'a>(text: &'a str, prefix: &str, end: &str) -> Option<&'a str> {
    let start = text.find(prefix)? + prefix.len();
    let rest = &text[start..];
    rest.find(end).map(|idx| &rest[..idx])
}
