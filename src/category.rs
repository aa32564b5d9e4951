//! Advisory category badges guessed from keyword matches.
//!
//! Cosmetic only: the guess decorates list rows when no explicit
//! category filter is active, and never touches persisted state.

const TECHNOLOGY: &[&str] = &[
    "tech", "technology", "gadget", "software", "hardware", "ai", "startup",
];
const BUSINESS: &[&str] = &[
    "business", "finance", "economy", "market", "stock", "economic", "financial",
];
const SPORTS: &[&str] = &[
    "sport", "football", "basketball", "soccer", "baseball", "tennis", "olympics",
];
const HEALTH: &[&str] = &[
    "health", "medical", "medicine", "doctor", "disease", "hospital", "wellness",
];
const ENTERTAINMENT: &[&str] = &[
    "entertainment", "movie", "music", "celebrity", "film", "actor", "actress", "hollywood",
];
const SCIENCE: &[&str] = &[
    "science", "research", "study", "scientist", "discovery", "experiment", "laboratory",
];

const TABLES: &[(&str, &[&str])] = &[
    ("Technology", TECHNOLOGY),
    ("Business", BUSINESS),
    ("Sports", SPORTS),
    ("Health", HEALTH),
    ("Entertainment", ENTERTAINMENT),
    ("Science", SCIENCE),
];

/// Best-effort display category from title, description, and source name.
pub fn infer_category(
    title: Option<&str>,
    description: Option<&str>,
    source_name: Option<&str>,
) -> Option<&'static str> {
    let haystack = format!(
        "{} {} {}",
        source_name.unwrap_or_default().to_lowercase(),
        title.unwrap_or_default().to_lowercase(),
        description.unwrap_or_default().to_lowercase(),
    );

    for (label, keywords) in TABLES {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return Some(label);
        }
    }

    None
}
