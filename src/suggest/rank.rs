use super::cache::CacheView;
use super::matcher::SimilarityMatcher;
use super::types::{Diagnostic, EntityRecord, Suggestion};
use crate::model::config::PeopleSettings;

/// Knobs for [`rank`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    /// Cap for the empty-query listing.
    pub suggestions_limit: usize,
    /// Cap handed to the matcher for non-empty queries.
    pub search_limit: usize,
    /// Scores above this are dropped.
    pub threshold: f64,
    /// Append a "create new" entry when nothing matches exactly.
    pub offer_new: bool,
}

impl RankOptions {
    pub fn from_settings(settings: &PeopleSettings) -> Self {
        Self {
            suggestions_limit: settings.suggestions_limit,
            search_limit: settings.search_limit,
            threshold: settings.match_threshold,
            offer_new: settings.offers_new_entities(),
        }
    }
}

impl Default for RankOptions {
    fn default() -> Self {
        Self::from_settings(&PeopleSettings::default())
    }
}

/// Order the cached people for `query`.
///
/// Surrounding whitespace is not part of a name: matching, the exact check and
/// the offered new name all use the trimmed query.
pub fn rank(
    query: &str,
    view: CacheView<'_>,
    matcher: &dyn SimilarityMatcher,
    options: &RankOptions,
) -> Vec<Suggestion> {
    let query = query.trim();
    let records = match view {
        CacheView::Ready(records) => records,
        CacheView::Unavailable(reason) => {
            return vec![Suggestion::Diagnostic(Diagnostic::roster_unavailable(reason))];
        }
    };

    if query.is_empty() {
        return records
            .iter()
            .take(options.suggestions_limit)
            .cloned()
            .map(Suggestion::Existing)
            .collect();
    }

    let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
    let hits = matcher.search(query, &labels, options.search_limit);
    tracing::debug!("matcher returned {} hits for `{query}`", hits.len());

    // Matchers are not trusted to honour the threshold or the cap.
    let survivors: Vec<&EntityRecord> = hits
        .iter()
        .filter(|hit| hit.score <= options.threshold)
        .filter_map(|hit| records.get(hit.index))
        .take(options.search_limit)
        .collect();

    let (mut exact, fuzzy): (Vec<&EntityRecord>, Vec<&EntityRecord>) =
        survivors.into_iter().partition(|r| r.label == query);

    // An exact name the matcher dropped or capped away is still promoted.
    if exact.is_empty() {
        exact.extend(records.iter().find(|r| r.label == query));
    }

    let has_exact = !exact.is_empty();
    let mut result: Vec<Suggestion> = exact
        .into_iter()
        .chain(fuzzy)
        .cloned()
        .map(Suggestion::Existing)
        .collect();

    if !has_exact && options.offer_new {
        result.push(Suggestion::NewEntity {
            label: query.to_string(),
        });
    }

    tracing::debug!("ranked {} suggestions for `{query}`", result.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Resource;
    use crate::suggest::matcher::{ScoredMatch, SkimSimilarity};

    fn records(names: &[&str]) -> Vec<EntityRecord> {
        names
            .iter()
            .map(|name| EntityRecord {
                label: name.to_string(),
                handle: Resource::new(format!("/v/{name}.md")),
            })
            .collect()
    }

    fn labels(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(Suggestion::label).collect()
    }

    /// Returns fixed hits regardless of the query.
    struct Scripted(Vec<ScoredMatch>);

    impl SimilarityMatcher for Scripted {
        fn search(&self, _query: &str, _candidates: &[&str], _limit: usize) -> Vec<ScoredMatch> {
            self.0.clone()
        }
    }

    fn hit(index: usize, score: f64) -> ScoredMatch {
        ScoredMatch { index, score }
    }

    #[test]
    fn empty_query_lists_first_records() {
        let people = records(&["A", "B", "C"]);
        let options = RankOptions {
            suggestions_limit: 2,
            ..RankOptions::default()
        };
        let result = rank("", CacheView::Ready(&people), &SkimSimilarity::default(), &options);
        assert_eq!(labels(&result), ["A", "B"]);
        assert!(result.iter().all(|s| matches!(s, Suggestion::Existing(_))));
    }

    #[test]
    fn empty_query_and_empty_cache_yield_nothing() {
        let result = rank(
            "",
            CacheView::Ready(&[]),
            &SkimSimilarity::default(),
            &RankOptions::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn scores_above_threshold_are_refiltered() {
        let people = records(&["Alice", "Alina", "Bob"]);
        let matcher = Scripted(vec![hit(0, 0.05), hit(2, 0.9), hit(1, 0.3)]);
        let result = rank("ali", CacheView::Ready(&people), &matcher, &RankOptions::default());
        assert_eq!(labels(&result), ["Alice", "Alina", "ali"]);
    }

    #[test]
    fn exact_match_moves_first_and_suppresses_new_entry() {
        let people = records(&["Ann Lee", "Ann", "Anna"]);
        let matcher = Scripted(vec![hit(0, 0.0), hit(2, 0.01), hit(1, 0.02)]);
        let result = rank("Ann", CacheView::Ready(&people), &matcher, &RankOptions::default());
        assert_eq!(labels(&result), ["Ann", "Ann Lee", "Anna"]);
        assert!(!result.iter().any(Suggestion::is_new));
    }

    #[test]
    fn exact_match_is_case_sensitive() {
        let people = records(&["alice"]);
        let matcher = Scripted(vec![hit(0, 0.0)]);
        let result = rank("Alice", CacheView::Ready(&people), &matcher, &RankOptions::default());
        assert_eq!(labels(&result), ["alice", "Alice"]);
        assert!(result[1].is_new());
    }

    #[test]
    fn exact_match_outside_search_cap_is_still_promoted() {
        let people = records(&["Jo A", "Jo B", "Jo"]);
        let matcher = Scripted(vec![hit(0, 0.0), hit(1, 0.0)]);
        let options = RankOptions {
            search_limit: 2,
            ..RankOptions::default()
        };
        let result = rank("Jo", CacheView::Ready(&people), &matcher, &options);
        assert_eq!(labels(&result), ["Jo", "Jo A", "Jo B"]);
    }

    #[test]
    fn new_entry_is_last_and_unique() {
        let people = records(&["Alice", "Alicia"]);
        let result = rank(
            "ali",
            CacheView::Ready(&people),
            &SkimSimilarity::default(),
            &RankOptions::default(),
        );
        assert_eq!(result.iter().filter(|s| s.is_new()).count(), 1);
        assert!(result.last().is_some_and(Suggestion::is_new));
    }

    #[test]
    fn new_entry_can_be_hidden() {
        let options = RankOptions {
            offer_new: false,
            ..RankOptions::default()
        };
        let result = rank("Zoe", CacheView::Ready(&[]), &SkimSimilarity::default(), &options);
        assert!(result.is_empty());
    }

    #[test]
    fn unavailable_roster_gives_one_diagnostic() {
        let result = rank(
            "ali",
            CacheView::Unavailable("no provider"),
            &SkimSimilarity::default(),
            &RankOptions::default(),
        );
        assert_eq!(result.len(), 1);
        assert!(matches!(
            &result[0],
            Suggestion::Diagnostic(d) if d.details.contains("no provider")
        ));
    }

    #[test]
    fn trailing_space_is_not_part_of_the_name() {
        let result = rank(
            "Zoe ",
            CacheView::Ready(&[]),
            &SkimSimilarity::default(),
            &RankOptions::default(),
        );
        assert_eq!(labels(&result), ["Zoe"]);

        let people = records(&["Zoe"]);
        let matcher = Scripted(vec![hit(0, 0.0)]);
        let result = rank("Zoe ", CacheView::Ready(&people), &matcher, &RankOptions::default());
        assert_eq!(labels(&result), ["Zoe"]);
        assert!(!result.iter().any(Suggestion::is_new));
    }

    #[test]
    fn ranking_is_idempotent() {
        let people = records(&["Alice", "Alina", "Malik", "Bob"]);
        let matcher = SkimSimilarity::default();
        let options = RankOptions::default();
        let first = rank("ali", CacheView::Ready(&people), &matcher, &options);
        let second = rank("ali", CacheView::Ready(&people), &matcher, &options);
        assert_eq!(first, second);
    }
}
