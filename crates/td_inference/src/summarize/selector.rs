use std::collections::HashSet;

use td_core::{Candidate, ScoredSentence, Sentence, Summary};

/// Picks the summary sentences: ranked by score, emitted in document order.
#[derive(Debug, Clone, Default)]
pub struct SummarySelector;

impl SummarySelector {
    pub fn new() -> Self {
        Self
    }

    /// Ranks sentences by score (ties go to the earlier sentence) and keeps a
    /// pool of the best `3 * max_count`. The first `max_count` distinct texts of
    /// that pool, in rank order, form the summary, which is then put back into
    /// document order.
    pub fn select(&self, candidate: &Candidate, scored: &[ScoredSentence], max_count: usize) -> Summary {
        if max_count == 0 || scored.is_empty() {
            return Summary::new(candidate.clone(), Vec::new());
        }

        let mut ranked: Vec<usize> = (0..scored.len()).collect();
        ranked.sort_by(|&a, &b| {
            scored[b]
                .score
                .total_cmp(&scored[a].score)
                .then(scored[a].sentence.position.cmp(&scored[b].sentence.position))
                .then(a.cmp(&b))
        });
        ranked.truncate(max_count.saturating_mul(3));

        let mut seen = HashSet::new();
        let mut picked: Vec<usize> = Vec::with_capacity(max_count);
        for idx in ranked {
            if picked.len() == max_count {
                break;
            }
            if seen.insert(scored[idx].sentence.text.as_str()) {
                picked.push(idx);
            }
        }

        // The top-ranked sentence is always picked, so non-empty input never
        // needs a positional fallback.
        Summary::new(candidate.clone(), Self::in_document_order(scored, picked))
    }

    fn in_document_order(scored: &[ScoredSentence], mut picked: Vec<usize>) -> Vec<Sentence> {
        picked.sort_by_key(|&idx| (scored[idx].sentence.position, idx));
        picked.into_iter().map(|idx| scored[idx].sentence.clone()).collect()
    }
}
