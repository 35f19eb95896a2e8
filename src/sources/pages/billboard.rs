use super::super::html::attribute;
use super::super::web::PageParser;
use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use scraper::Selector;
use serde::Deserialize;
use tracing::{error, trace};

lazy_static! {
    static ref CHART_ROW: Selector = Selector::parse(".chart-list-item").unwrap();
    static ref CHARTS: Selector = Selector::parse("[data-charts]").unwrap();
}

fn weekly_url(base: &str, date: NaiveDate) -> (String, NaiveDate) {
    (
        format!("{}{}", base, date.format("%Y-%m-%d")),
        date - Days::new(7),
    )
}

/// Chart rows such as
/// `<div class="chart-list-item" data-artist="Artist" data-title="Title">`.
pub struct Billboard;

impl PageParser for Billboard {
    fn find_songs(&self, record: &str) -> Vec<String> {
        if !record.contains("chart-list-item") {
            return Vec::new();
        }
        trace!("Found chart row {}", record);
        match (
            attribute(record, &CHART_ROW, "data-artist"),
            attribute(record, &CHART_ROW, "data-title"),
        ) {
            (Some(artist), Some(title)) => vec![format!("{} - {}", artist, title)],
            _ => Vec::new(),
        }
    }

    fn history_url(&self, base: &str, date: NaiveDate) -> (String, NaiveDate) {
        weekly_url(base, date)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEntry {
    #[serde(default)]
    artist_name: String,
    #[serde(default)]
    title: String,
}

/// Charts embedded as escaped JSON in a `data-charts` attribute.
pub struct BillboardCharts;

impl PageParser for BillboardCharts {
    fn find_songs(&self, record: &str) -> Vec<String> {
        if !record.contains("data-charts") {
            return Vec::new();
        }
        let Some(charts) = attribute(record, &CHARTS, "data-charts") else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<ChartEntry>>(&charts) {
            Ok(entries) => entries
                .into_iter()
                .map(|e| format!("{} - {}", e.artist_name, e.title))
                .collect(),
            Err(e) => {
                error!("Could not decode chart json: {}", e);
                Vec::new()
            }
        }
    }

    fn history_url(&self, base: &str, date: NaiveDate) -> (String, NaiveDate) {
        weekly_url(base, date)
    }
}
