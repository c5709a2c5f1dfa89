//! Token-overlap similarity scoring.
//!
//! Scores are the overlap ratio: the number of query tokens that also
//! appear in the candidate, divided by the longer of the two token lists.
//! This is deliberately not Jaccard; partially-overlapping strings rank
//! differently under the two formulas, so one had to be picked and kept.
//! `"thank you very much"` vs `"thank you so much"` scores 0.75 here
//! (Jaccard would give 0.6).

use parlo_types::SearchResult;
use std::collections::HashSet;

/// Overlap-ratio similarity between two strings, in `[0, 1]`.
///
/// Tokenization is lowercase whitespace splitting. Either side being
/// empty (or whitespace-only) scores 0.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let query_tokens = tokenize(query);
    let candidate_tokens = tokenize(candidate);
    if query_tokens.is_empty() || candidate_tokens.is_empty() {
        return 0.0;
    }

    let candidate_set: HashSet<&str> = candidate_tokens.iter().map(String::as_str).collect();
    let overlap = query_tokens
        .iter()
        .filter(|t| candidate_set.contains(t.as_str()))
        .count();

    overlap as f64 / query_tokens.len().max(candidate_tokens.len()) as f64
}

/// Score every candidate against the query, sorted by descending score.
///
/// The sort is stable: ties keep the original candidate order.
pub fn rank<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = candidates
        .iter()
        .map(|c| SearchResult {
            text: c.as_ref().to_string(),
            score: similarity(query, c.as_ref()),
        })
        .collect();
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}

/// Top `k` candidates by score; returns all of them when fewer than `k`.
pub fn top_k<S: AsRef<str>>(query: &str, candidates: &[S], k: usize) -> Vec<SearchResult> {
    let mut results = rank(query, candidates);
    results.truncate(k);
    results
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.to_lowercase())
        .collect()
}
