//! Fuzzy card-name matching for search-as-you-type suggestions.
//!
//! Scoring (lower is better), first applicable rule wins:
//!
//! 1. exact case-insensitive name → 0.0
//! 2. name starts with the query → 0.1
//! 3. name contains the query → 0.3
//! 4. type line contains the query → 0.5
//! 5. otherwise normalized Levenshtein distance between name and query
//!
//! Candidates scoring above [`MatcherConfig::max_score`] are dropped.
//! [`FuzzyMatcher::search_suggestions`] then merges the local matches with
//! results from a remote search, always listing the user's own collection
//! first.

pub mod cache;
pub mod levenshtein;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::card::CardRecord;
use crate::config::MatcherConfig;

pub use cache::{LruCache, NoCache, SuggestionCache};

const EXACT_SCORE: f64 = 0.0;
const PREFIX_SCORE: f64 = 0.1;
const SUBSTRING_SCORE: f64 = 0.3;
const TYPE_LINE_SCORE: f64 = 0.5;
/// Remote results arrive already ranked and are not re-scored.
const REMOTE_SCORE: f64 = 0.0;

/// Where a suggestion came from. Collection sorts before remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Collection,
    Remote,
}

/// A candidate card with its match score.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub card: CardRecord,
    pub score: f64,
    pub source: Source,
}

/// Ranks card records against a typed query.
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher {
    config: MatcherConfig,
}

impl FuzzyMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Scores `candidates` against `query` and returns those within the
    /// score threshold, best first. Equal scores keep input order.
    ///
    /// Results are tagged [`Source::Collection`]. No length cap is applied.
    pub fn match_candidates(&self, query: &str, candidates: &[CardRecord]) -> Vec<MatchResult> {
        if query.is_empty() {
            return Vec::new();
        }
        let query_lower = query.to_lowercase();

        let mut results: Vec<MatchResult> = candidates
            .iter()
            .filter_map(|card| {
                let score = score_candidate(&query_lower, card);
                (score <= self.config.max_score).then(|| MatchResult {
                    card: card.clone(),
                    score,
                    source: Source::Collection,
                })
            })
            .collect();

        results.sort_by(|a, b| a.score.total_cmp(&b.score));
        results
    }

    /// Builds the suggestion list for `query`.
    ///
    /// Local matches come first, then `remote` in the order given (each with
    /// score 0). The merged list is cut to
    /// [`MatcherConfig::max_suggestions`]. A hit in `cache` for the exact
    /// query string is returned without recomputing, whatever the
    /// candidates are.
    pub fn search_suggestions(
        &self,
        query: &str,
        local: &[CardRecord],
        remote: &[CardRecord],
        cache: &mut dyn SuggestionCache,
    ) -> Vec<MatchResult> {
        if query.is_empty() {
            return Vec::new();
        }
        if let Some(cached) = cache.lookup(query) {
            debug!(query, results = cached.len(), "suggestion cache hit");
            return cached;
        }

        let mut merged = self.match_candidates(query, local);
        let local_hits = merged.len();
        merged.extend(remote.iter().map(|card| MatchResult {
            card: card.clone(),
            score: REMOTE_SCORE,
            source: Source::Remote,
        }));

        merged.sort_by(|a, b| a.source.cmp(&b.source).then(a.score.total_cmp(&b.score)));
        merged.truncate(self.config.max_suggestions);

        debug!(
            query,
            local_hits,
            remote = remote.len(),
            returned = merged.len(),
            "computed suggestions"
        );
        cache.store(query, &merged);
        merged
    }
}

/// Scores one candidate. `query_lower` must already be lowercased.
fn score_candidate(query_lower: &str, card: &CardRecord) -> f64 {
    let name = card.name.to_lowercase();

    if name == query_lower {
        return EXACT_SCORE;
    }
    if name.starts_with(query_lower) {
        return PREFIX_SCORE;
    }
    if name.contains(query_lower) {
        return SUBSTRING_SCORE;
    }
    let type_hit = card
        .type_line
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains(query_lower));
    if type_hit {
        return TYPE_LINE_SCORE;
    }
    levenshtein::normalized(&name, query_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str) -> CardRecord {
        CardRecord::new(name)
    }

    #[test]
    fn test_rule_scores() {
        let matcher = FuzzyMatcher::default();
        let candidates = vec![
            card("Bolt"),
            card("Boltwave"),
            card("Lightning Bolt"),
            card("Goblin Guide").with_type_line("Creature — Bolt Thrower"),
        ];
        let results = matcher.match_candidates("bolt", &candidates);
        let scores: Vec<f64> = results.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.0, 0.1, 0.3, 0.5]);
        assert!(results.iter().all(|r| r.source == Source::Collection));
    }

    #[test]
    fn test_edit_distance_fallback() {
        let matcher = FuzzyMatcher::default();
        // "shok" -> "shock" is one insertion over five chars.
        let results = matcher.match_candidates("shok", &[card("Shock")]);
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let config = MatcherConfig {
            max_score: 0.5,
            ..MatcherConfig::default()
        };
        let matcher = FuzzyMatcher::new(config);
        let typed = card("Grizzly Bears").with_type_line("Creature — Bear");
        assert_eq!(matcher.match_candidates("creature", &[typed]).len(), 1);
    }

    #[test]
    fn test_stable_ties() {
        let matcher = FuzzyMatcher::default();
        let candidates = vec![card("Bolt Alpha"), card("Bolt Beta"), card("Bolt Gamma")];
        let names: Vec<String> = matcher
            .match_candidates("bolt", &candidates)
            .into_iter()
            .map(|r| r.card.name)
            .collect();
        assert_eq!(names, vec!["Bolt Alpha", "Bolt Beta", "Bolt Gamma"]);
    }

    #[test]
    fn test_empty_inputs() {
        let matcher = FuzzyMatcher::default();
        assert!(matcher.match_candidates("", &[card("Shock")]).is_empty());
        assert!(matcher.match_candidates("shock", &[]).is_empty());
        assert!(
            matcher
                .search_suggestions("", &[card("Shock")], &[card("Shock")], &mut NoCache)
                .is_empty()
        );
    }

    #[test]
    fn test_does_not_mutate_candidates() {
        let matcher = FuzzyMatcher::default();
        let candidates = vec![card("Counterspell").with_oracle_text("Counter target spell.")];
        let before = candidates.clone();
        let _ = matcher.match_candidates("counter", &candidates);
        assert_eq!(candidates, before);
    }

    #[test]
    fn test_cache_is_consulted_by_exact_query() {
        let matcher = FuzzyMatcher::default();
        let mut cache = LruCache::new(8);
        let first = matcher.search_suggestions("Bolt", &[card("Lightning Bolt")], &[], &mut cache);
        assert_eq!(first.len(), 1);

        // Same query, different candidates: served from the cache.
        let again = matcher.search_suggestions("Bolt", &[], &[], &mut cache);
        assert_eq!(again, first);

        // Different case is a different key.
        let lower = matcher.search_suggestions("bolt", &[], &[], &mut cache);
        assert!(lower.is_empty());
    }

    #[test]
    fn test_remote_results_keep_order_after_collection() {
        let matcher = FuzzyMatcher::default();
        let results = matcher.search_suggestions(
            "bolt",
            &[card("Lightning Bolt")],
            &[card("Bolt Bend"), card("Boltwork")],
            &mut NoCache,
        );
        let names: Vec<&str> = results.iter().map(|r| r.card.name.as_str()).collect();
        assert_eq!(names, vec!["Lightning Bolt", "Bolt Bend", "Boltwork"]);
        assert_eq!(results[1].source, Source::Remote);
        assert!(results[1].score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_serialized_shape() {
        let result = MatchResult {
            card: card("Shock").with_type_line("Instant"),
            score: 0.1,
            source: Source::Remote,
        };
        let json = serde_json::to_value(&result).expect("result should serialize");
        assert_eq!(json["name"], "Shock");
        assert_eq!(json["typeLine"], "Instant");
        assert_eq!(json["source"], "remote");
    }
}
