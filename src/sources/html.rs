//! Attribute lookups on scraped HTML fragments.

use scraper::{Html, Selector};

/// Value of `attr` on the first element matching `selector`, with character
/// references decoded.
pub fn attribute(fragment: &str, selector: &Selector, attr: &str) -> Option<String> {
    Html::parse_fragment(fragment)
        .select(selector)
        .find_map(|element| element.value().attr(attr).map(str::to_string))
}
