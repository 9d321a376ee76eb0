// src/checker/suggest.rs
// =============================================================================
// "Did you mean ...?" for anchors that don't exist on a page.
//
// The matcher scores each candidate by how many of the query's character
// n-grams (lengths 3, 4 and 5) also occur in the candidate. The best positive
// score wins; ties go to the higher Jaro-Winkler similarity, then to the
// earlier candidate.
// =============================================================================

use std::collections::HashSet;

/// Narrow seam for approximate matching, so the strategy can be swapped.
pub trait ClosestMatch: Send + Sync {
    fn best_match(&self, candidates: &[String], query: &str) -> Option<String>;
}

pub struct NgramMatcher {
    sizes: Vec<usize>,
}

impl Default for NgramMatcher {
    fn default() -> Self {
        Self {
            sizes: vec![3, 4, 5],
        }
    }
}

impl NgramMatcher {
    fn score(&self, query: &[char], candidate: &[char]) -> usize {
        self.sizes
            .iter()
            .map(|&n| {
                let have: HashSet<&[char]> = candidate.windows(n).collect();
                query.windows(n).filter(|gram| have.contains(gram)).count()
            })
            .sum()
    }
}

impl ClosestMatch for NgramMatcher {
    fn best_match(&self, candidates: &[String], query: &str) -> Option<String> {
        let query_chars: Vec<char> = query.chars().collect();
        let mut best: Option<(&String, usize, f64)> = None;

        for candidate in candidates {
            let candidate_chars: Vec<char> = candidate.chars().collect();
            let score = self.score(&query_chars, &candidate_chars);
            if score == 0 {
                continue;
            }
            let similarity = strsim::jaro_winkler(query, candidate);

            let better = match best {
                None => true,
                Some((_, best_score, best_similarity)) => {
                    score > best_score || (score == best_score && similarity > best_similarity)
                }
            };
            if better {
                best = Some((candidate, score, similarity));
            }
        }

        best.map(|(candidate, _, _)| candidate.clone())
    }
}
