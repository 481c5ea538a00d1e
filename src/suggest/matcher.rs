use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// One hit from a [`SimilarityMatcher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch {
    /// Index into the candidate slice.
    pub index: usize,
    /// 0.0 is a perfect match, 1.0 no similarity at all.
    pub score: f64,
}

/// Approximate string matching over a candidate list.
///
/// Results come back best first and at most `limit` long. Implementations are
/// not required to apply any threshold; callers filter scores themselves.
pub trait SimilarityMatcher {
    fn search(&self, query: &str, candidates: &[&str], limit: usize) -> Vec<ScoredMatch>;
}

/// Skim's V2 scorer, normalised against the query's score on itself.
pub struct SkimSimilarity {
    matcher: SkimMatcherV2,
}

impl Default for SkimSimilarity {
    fn default() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
        }
    }
}

impl SkimSimilarity {
    fn normalised(&self, candidate: &str, query: &str, ideal: i64) -> Option<f64> {
        let raw = self.matcher.fuzzy_match(candidate, query)?;
        if ideal <= 0 {
            return Some(1.0);
        }
        Some((1.0 - raw as f64 / ideal as f64).clamp(0.0, 1.0))
    }
}

impl SimilarityMatcher for SkimSimilarity {
    fn search(&self, query: &str, candidates: &[&str], limit: usize) -> Vec<ScoredMatch> {
        let ideal = self.matcher.fuzzy_match(query, query).unwrap_or(0);

        let mut hits: Vec<ScoredMatch> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                self.normalised(candidate, query, ideal)
                    .map(|score| ScoredMatch { index, score })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits.truncate(limit);
        hits
    }
}
