//! Pair features: topic match, file overlap, text-similarity fallback.

use std::collections::HashSet;

use reverie_core::models::FeatureVector;
use reverie_core::observation::Observation;
use reverie_core::priority::PriorityWeights;

/// Words this short never count toward title overlap.
const MIN_WORD_LEN: usize = 4;

/// Strip any leading `./` and lower-case.
pub fn normalize_path(path: &str) -> String {
    let mut p = path.trim();
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    p.to_lowercase()
}

fn lowered(items: &[String]) -> HashSet<String> {
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Whether the concept sets intersect, ignoring case.
pub fn topic_match(a: &[String], b: &[String]) -> bool {
    let a = lowered(a);
    lowered(b).iter().any(|c| a.contains(c))
}

/// Jaccard overlap of normalised modified-file paths. 0 if either side is empty.
pub fn file_overlap(a: &[String], b: &[String]) -> f64 {
    let norm = |files: &[String]| -> HashSet<String> {
        files
            .iter()
            .map(|f| normalize_path(f))
            .filter(|f| !f.is_empty())
            .collect()
    };
    jaccard(&norm(a), &norm(b))
}

/// Jaccard over lower-cased concepts.
pub fn concept_jaccard(a: &[String], b: &[String]) -> f64 {
    jaccard(&lowered(a), &lowered(b))
}

/// `|A ∩ B| / max(|A|, |B|)` over lower-cased title words longer than three characters.
pub fn title_word_overlap(a: Option<&str>, b: Option<&str>) -> f64 {
    let words = |s: &str| -> HashSet<String> {
        s.split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| w.chars().count() >= MIN_WORD_LEN)
            .collect()
    };
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    let (a, b) = (words(a), words(b));
    let larger = a.len().max(b.len());
    if larger == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / larger as f64
}

/// Similarity heuristic used when no provider answers: concept Jaccard when
/// either side has concepts, otherwise title word overlap.
pub fn text_similarity(older: &Observation, newer: &Observation) -> f64 {
    if !older.concepts.is_empty() || !newer.concepts.is_empty() {
        concept_jaccard(&older.concepts, &newer.concepts)
    } else {
        title_word_overlap(older.title.as_deref(), newer.title.as_deref())
    }
}

/// Build the feature vector for a pair given an already-computed semantic similarity.
pub fn extract_features(
    older: &Observation,
    newer: &Observation,
    semantic_similarity: f64,
    priorities: &PriorityWeights,
) -> FeatureVector {
    FeatureVector {
        semantic_similarity: semantic_similarity.clamp(0.0, 1.0),
        topic_match: topic_match(&older.concepts, &newer.concepts),
        file_overlap: file_overlap(&older.files_modified, &newer.files_modified),
        type_match: if older.observation_type == newer.observation_type {
            1.0
        } else {
            0.0
        },
        time_delta_hours: newer.hours_after(older).max(0.0),
        priority_score: priorities.weight(newer.observation_type),
        older_reference_count: older.reference_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_strips_dot_slash_and_case() {
        assert_eq!(normalize_path("./src/Main.rs"), "src/main.rs");
        assert_eq!(normalize_path("././a.rs"), "a.rs");
        assert_eq!(normalize_path("/abs/Path"), "/abs/path");
    }

    #[test]
    fn file_overlap_is_jaccard() {
        let a = strings(&["./src/a.rs", "src/b.rs"]);
        let b = strings(&["src/A.rs", "src/c.rs"]);
        assert!((file_overlap(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(file_overlap(&a, &[]), 0.0);
    }

    #[test]
    fn topic_match_ignores_case() {
        assert!(topic_match(&strings(&["Parser"]), &strings(&["parser", "lexer"])));
        assert!(!topic_match(&strings(&["parser"]), &strings(&["cache"])));
        assert!(!topic_match(&[], &[]));
    }

    #[test]
    fn title_overlap_ignores_short_words() {
        let s = title_word_overlap(Some("Fix the auth token bug"), Some("Auth token refresh"));
        // {auth, token} ∩ over max(|{auth, token}|, |{auth, token, refresh}|) = 2/3
        assert!((s - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(title_word_overlap(Some("a b c"), Some("a b c")), 0.0);
        assert_eq!(title_word_overlap(None, Some("anything here")), 0.0);
    }

    #[test]
    fn concept_jaccard_with_one_empty_side_is_zero() {
        assert_eq!(concept_jaccard(&strings(&["x"]), &[]), 0.0);
    }
}
