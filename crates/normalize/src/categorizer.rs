//! Keyword categorizer for sources that do not carry their own taxonomy.

const GENRE_KEYWORDS: &[(&str, &[&str])] = &[
    ("country", &["country", "honky tonk", "twang", "bluegrass", "americana"]),
    ("rock", &["rock", "punk", "metal", "alternative", "indie rock"]),
    ("jazz", &["jazz", "swing", "bebop"]),
    ("blues", &["blues", "rhythm and blues", "r&b"]),
    ("electronic", &["electronic", "edm", "house", "techno", "dubstep"]),
    ("hip-hop", &["hip hop", "hip-hop", " rap ", " trap "]),
    ("folk", &["folk", "acoustic", "singer-songwriter"]),
    ("pop", &["pop", "top 40"]),
    ("classical", &["classical", "orchestra", "symphony"]),
];

const GENERAL_GENRE: &str = "general";

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Pick a category and, for music-like categories, a genre from free text.
///
/// Checks are substring matches over the lower-cased name, description and
/// venue, evaluated in priority order: festival, comedy, theater, sports,
/// then music as the fallback.
#[must_use]
pub fn categorize_event(
    name: &str,
    description: &str,
    venue: &str,
) -> (&'static str, Option<&'static str>) {
    let combined =
        format!("{} {} {}", name.to_lowercase(), description.to_lowercase(), venue.to_lowercase());

    if contains_any(&combined, &["fest", "festival"]) {
        return ("festival", Some(detect_genre(&combined)));
    }
    if contains_any(&combined, &["comedy", "comedian", "stand-up", "standup"]) {
        return ("comedy", None);
    }
    if contains_any(&combined, &["theater", "theatre", "play", "musical", "broadway"]) {
        return ("theater", None);
    }
    if contains_any(&combined, &["game", "match", "tournament", "sports"]) {
        return ("sports", None);
    }
    ("music", Some(detect_genre(&combined)))
}

/// First genre whose keywords appear in `text` (already lower-cased).
#[must_use]
pub fn detect_genre(text: &str) -> &'static str {
    GENRE_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(text, keywords))
        .map_or(GENERAL_GENRE, |(genre, _)| genre)
}
