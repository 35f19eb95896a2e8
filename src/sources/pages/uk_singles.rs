use super::super::html::attribute;
use super::super::web::PageParser;
use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use scraper::Selector;

const ARTIST_PATH: &str = "/artist/";
const TITLE_PATH: &str = "/search/singles/";

lazy_static! {
    static ref ARTIST_LINK: Selector = Selector::parse(r#"a[href^="/artist/"]"#).unwrap();
    static ref TITLE_LINK: Selector = Selector::parse(r#"a[href^="/search/singles/"]"#).unwrap();
}

/// Official UK singles chart. Each table cell links to the title search and
/// the artist page; names are taken from the url slugs.
pub struct UkSingles;

fn slug_to_name(slug: &str) -> String {
    slug.replace('-', " ")
}

impl PageParser for UkSingles {
    fn delimiter(&self) -> &str {
        "</td>"
    }

    fn song_limit(&self) -> Option<usize> {
        Some(10)
    }

    fn find_songs(&self, record: &str) -> Vec<String> {
        if !record.contains(TITLE_PATH) || !record.contains(ARTIST_PATH) {
            return Vec::new();
        }
        let (Some(title_href), Some(artist_href)) = (
            attribute(record, &TITLE_LINK, "href"),
            attribute(record, &ARTIST_LINK, "href"),
        ) else {
            return Vec::new();
        };

        // `/artist/<id>/<name>/...` and `/search/singles/<title>/...`
        let artist: Vec<&str> = artist_href
            .strip_prefix(ARTIST_PATH)
            .map(|rest| rest.splitn(3, '/').collect())
            .unwrap_or_default();
        let title: Vec<&str> = title_href
            .strip_prefix(TITLE_PATH)
            .map(|rest| rest.splitn(2, '/').collect())
            .unwrap_or_default();
        if artist.len() != 3 || title.len() != 2 {
            return Vec::new();
        }
        vec![format!("{} - {}", slug_to_name(artist[1]), slug_to_name(title[0]))]
    }

    fn history_url(&self, base: &str, date: NaiveDate) -> (String, NaiveDate) {
        (
            base.replace("{DATE}", &date.format("%Y%m%d").to_string()),
            date - Days::new(7),
        )
    }
}
