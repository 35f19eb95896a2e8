//! Word lists tuning the match score.

/// Candidates containing any of these are covers or karaoke versions.
pub const DENYLIST: [&str; 10] = [
    "acapella",
    "acappella",
    "as made famous",
    "in the style of",
    "in style of",
    "karaoke",
    "made famous by",
    "originally performed by",
    "reprise",
    "tribute",
];

/// Cost 10 points when only the candidate mentions them.
pub const PENALTY_WORDS: [&str; 5] = ["acoustic", "instrumental", "live", "unplugged", "remix"];

/// Earn 5 points when only the candidate mentions them.
pub const AWARD_WORDS: [&str; 3] = ["radio", "remastered", "single"];

/// Removed from the radio title so that two different songs sharing an edit
/// label do not match on the label alone. Keep in sync with [`AWARD_WORDS`].
pub const AWARD_EXPRESSIONS: [&str; 3] = ["radio edit", "remastered", "single edit"];

/// Words joining artist names, always counted as matched.
pub const ARTIST_JOINERS: [&str; 2] = ["feat", "vs"];
