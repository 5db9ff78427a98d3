use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use td_core::{DigestConfig, ScoredSentence, Sentence};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]+(?:'[\p{L}]+)?").expect("word regex");
}

/// Lowercase word tokens of `text`.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Scores sentences by their overlap with the rest of the article, weighted
/// by how many domain keywords they mention.
#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    keywords: Vec<String>,
    short_tokens: usize,
    short_factor: f64,
}

impl RelevanceScorer {
    pub fn new(keywords: &[String], short_tokens: usize, short_factor: f64) -> Self {
        Self {
            keywords: keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            short_tokens,
            short_factor,
        }
    }

    pub fn from_config(config: &DigestConfig) -> Self {
        Self::new(
            &config.domain_keywords,
            config.short_sentence_tokens,
            config.short_sentence_factor,
        )
    }

    /// One score per input sentence, in input order.
    pub fn score<I>(&self, sentences: I) -> Vec<ScoredSentence>
    where
        I: IntoIterator<Item = Sentence>,
    {
        let tokenized: Vec<(Sentence, Vec<String>)> = sentences
            .into_iter()
            .map(|sentence| {
                let tokens = tokenize(&sentence.text);
                (sentence, tokens)
            })
            .collect();

        let mut frequency: HashMap<&str, usize> = HashMap::new();
        for (_, tokens) in &tokenized {
            for token in tokens {
                *frequency.entry(token.as_str()).or_insert(0) += 1;
            }
        }

        let scores: Vec<f64> = tokenized
            .iter()
            .map(|(sentence, tokens)| {
                let base: usize = tokens
                    .iter()
                    .map(|t| frequency.get(t.as_str()).copied().unwrap_or(0))
                    .sum();
                let boost = self.keyword_hits(&sentence.text);
                let length_factor = if tokens.len() < self.short_tokens {
                    self.short_factor
                } else {
                    1.0
                };
                base as f64 * (1.0 + 2.0 * boost as f64) * length_factor
            })
            .collect();

        tokenized
            .into_iter()
            .zip(scores)
            .map(|((sentence, _), score)| ScoredSentence { sentence, score })
            .collect()
    }

    /// Number of distinct domain keywords present in `text`.
    pub fn keyword_hits(&self, text: &str) -> usize {
        let lower = text.to_lowercase();
        self.keywords.iter().filter(|k| lower.contains(k.as_str())).count()
    }
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::from_config(&DigestConfig::default())
    }
}
