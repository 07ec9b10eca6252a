//! Fuzzy title/tag scoring used by the in-memory report store

use crate::domain::report::Report;
use crate::domain::similarity::{normalize, terms, FuzzyOptions};

/// Query terms shorter than this only match exactly
const MIN_FUZZY_TERM_CHARS: usize = 3;

/// Score added for every tag that contains a query term
const TAG_MATCH_WEIGHT: f64 = 1.0;

/// Levenshtein distance counted in chars
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;

        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }

        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Edit distance between a query term and a word, if they count as a match
pub fn term_distance(term: &str, word: &str, options: &FuzzyOptions) -> Option<usize> {
    if term == word {
        return Some(0);
    }

    let term_len = term.chars().count();
    if term_len < MIN_FUZZY_TERM_CHARS || options.max_edits == 0 {
        return None;
    }

    let word_len = word.chars().count();
    if term_len.abs_diff(word_len) > options.max_edits {
        return None;
    }

    let prefix_matches = term
        .chars()
        .take(options.prefix_length)
        .eq(word.chars().take(options.prefix_length));
    if !prefix_matches {
        return None;
    }

    let distance = levenshtein(term, word);
    (distance <= options.max_edits).then_some(distance)
}

/// Relevance of a report for the given normalized query terms, 0.0 when it does not match
pub fn score(report: &Report, query_terms: &[&str], options: &FuzzyOptions) -> f64 {
    let title = normalize(&report.title);
    let title_words: Vec<&str> = terms(&title).collect();

    let title_score: f64 = query_terms
        .iter()
        .filter_map(|term| {
            title_words
                .iter()
                .filter_map(|word| term_distance(term, word, options))
                .min()
        })
        .map(|distance| 1.0 / (1.0 + distance as f64))
        .sum();

    let tag_matches = report
        .tags
        .iter()
        .map(|tag| normalize(tag))
        .filter(|tag| terms(tag).any(|word| query_terms.contains(&word)))
        .count();

    title_score + tag_matches as f64 * TAG_MATCH_WEIGHT
}

/// Ranks reports against a normalized query, best first, truncated to `limit`
pub fn rank<'a, I>(reports: I, query: &str, limit: usize, options: &FuzzyOptions) -> Vec<Report>
where
    I: IntoIterator<Item = &'a Report>,
{
    let query_terms: Vec<&str> = terms(query).collect();
    if query_terms.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(f64, &Report)> = reports
        .into_iter()
        .map(|report| (score(report, &query_terms, options), report))
        .filter(|(score, _)| *score > 0.0)
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, report)| report.clone())
        .collect()
}
