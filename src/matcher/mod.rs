//! Fuzzy matching of free-text `"Artist - Title"` strings against remote tracks.
//!
//! The score is an integer from 0 to 100. Anything at or above [`VALID_MATCH`]
//! is treated as the same song, 50 and below is most likely unrelated.

mod words;

use crate::playlist::Track;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, trace};
use words::{ARTIST_JOINERS, AWARD_EXPRESSIONS, AWARD_WORDS, DENYLIST, PENALTY_WORDS};

/// Minimum score for two songs to be considered the same.
pub const VALID_MATCH: i32 = 75;

/// Score given when every candidate word appears somewhere in the radio text
/// but the fields do not line up. Stays below an exact match.
const REORDERED_MATCH: i32 = 99;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\d]+").unwrap();
}

fn tokens(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// Score how well `candidate` matches the `radio` text `"Artist - Title"`.
pub fn score(radio: &str, candidate: &Track) -> i32 {
    let Some((radio_artist, radio_title)) = radio.split_once(" - ") else {
        debug!("Could not split artist and title: {:?}", radio);
        return 0;
    };

    let candidate_text = candidate.to_string().to_lowercase();
    if let Some(word) = DENYLIST.iter().find(|w| candidate_text.contains(*w)) {
        trace!("Denylisted candidate {:?} ({})", candidate_text, word);
        return 0;
    }

    let candidate_artist = candidate.artist().to_lowercase();
    let candidate_title = candidate.title().to_lowercase();
    let radio_artist = radio_artist.to_lowercase();
    let radio_title = AWARD_EXPRESSIONS
        .iter()
        .fold(radio_title.to_lowercase(), |title, expr| title.replace(expr, ""));

    let radio_artist = tokens(&radio_artist);
    let radio_title = tokens(&radio_title);
    let candidate_artist = tokens(&candidate_artist);
    let candidate_title = tokens(&candidate_title);

    let artist_ratio = ratio(&radio_artist, &candidate_artist);
    let title_ratio = ratio(&radio_title, &candidate_title);
    let mut result = (artist_ratio + title_ratio) / 2;

    if result < 100 {
        // Reversed check: every candidate word is somewhere in the radio text.
        let all_candidate = [candidate_artist, candidate_title].concat();
        let all_radio = [radio_artist, radio_title].concat();
        if ratio(&all_candidate, &all_radio) == 100 {
            result = REORDERED_MATCH;
        }
    }

    trace!("Score of {:?} against {:?}: {}", radio, candidate, result);
    result
}

/// Share of `radio` words found in `candidate`, adjusted for length
/// difference, penalty words and award words.
fn ratio(radio: &[&str], candidate: &[&str]) -> i32 {
    if radio.is_empty() || candidate.is_empty() {
        return 0;
    }

    let matched = radio
        .iter()
        .filter(|r| candidate.contains(*r) || ARTIST_JOINERS.contains(*r))
        .count() as i32;
    let mut result = matched * 100 / radio.len() as i32;

    let extra_words = candidate.len() as i32 - radio.len() as i32;
    result = (result - 5 * extra_words.max(0)).max(0);

    for penalty in PENALTY_WORDS {
        if !radio.contains(&penalty) && candidate.contains(&penalty) {
            result = (result - 10).max(0);
        }
    }
    for award in AWARD_WORDS {
        if !radio.contains(&award) && candidate.contains(&award) {
            result = (result + 5).min(100);
        }
    }
    result
}

/// Best-scoring candidate for `radio`, stopping early on a perfect match.
pub fn best_match<'a, I>(radio: &str, candidates: I) -> Option<(&'a Track, i32)>
where
    I: IntoIterator<Item = &'a Track>,
{
    let mut best: Option<(&Track, i32)> = None;
    for candidate in candidates {
        let current = score(radio, candidate);
        if best.map_or(true, |(_, s)| current > s) {
            best = Some((candidate, current));
        }
        if current == 100 {
            break;
        }
    }
    best
}
