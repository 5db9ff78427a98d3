use td_core::{DigestConfig, ImpactAssessment, ImpactLabel, Summary};

use crate::summarize::SentenceSplitter;

const MAX_JUSTIFICATION: usize = 3;

/// Rule-based good news / bad news labelling by keyword polarity.
#[derive(Debug, Clone)]
pub struct ImpactClassifier {
    favorable: Vec<String>,
    unfavorable: Vec<String>,
    splitter: SentenceSplitter,
}

fn normalize(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

fn occurrences(keywords: &[String], lower: &str) -> usize {
    keywords.iter().map(|k| lower.matches(k.as_str()).count()).sum()
}

impl ImpactClassifier {
    pub fn new(favorable: &[String], unfavorable: &[String], splitter: SentenceSplitter) -> Self {
        Self {
            favorable: normalize(favorable),
            unfavorable: normalize(unfavorable),
            splitter,
        }
    }

    pub fn from_config(config: &DigestConfig) -> Self {
        Self::new(
            &config.favorable_keywords,
            &config.unfavorable_keywords,
            SentenceSplitter::from_config(config),
        )
    }

    /// Classifies free text, splitting it into sentences for the justification.
    pub fn classify(&self, text: &str) -> ImpactAssessment {
        let mut sentences: Vec<String> = self.splitter.split(text).map(|s| s.text).collect();
        if sentences.is_empty() && !text.trim().is_empty() {
            sentences.push(text.trim().to_string());
        }
        self.assess(text, &sentences)
    }

    /// Classifies a summary using its own sentences for the justification.
    pub fn classify_summary(&self, summary: &Summary) -> ImpactAssessment {
        let sentences: Vec<String> = summary.sentences.iter().map(|s| s.text.clone()).collect();
        self.assess(&summary.text(), &sentences)
    }

    pub fn label(&self, text: &str) -> ImpactLabel {
        let lower = text.to_lowercase();
        let favorable = occurrences(&self.favorable, &lower);
        let unfavorable = occurrences(&self.unfavorable, &lower);

        if favorable > unfavorable && favorable >= 1 {
            ImpactLabel::Favorable
        } else if unfavorable > favorable && unfavorable >= 1 {
            ImpactLabel::Unfavorable
        } else {
            ImpactLabel::Neutral
        }
    }

    fn mentions_keyword(&self, sentence: &str) -> bool {
        let lower = sentence.to_lowercase();
        self.favorable
            .iter()
            .chain(self.unfavorable.iter())
            .any(|k| lower.contains(k.as_str()))
    }

    fn assess(&self, text: &str, sentences: &[String]) -> ImpactAssessment {
        let mut justification: Vec<String> = sentences
            .iter()
            .filter(|s| self.mentions_keyword(s))
            .take(MAX_JUSTIFICATION)
            .cloned()
            .collect();
        if justification.is_empty() {
            justification.extend(sentences.first().cloned());
        }

        ImpactAssessment {
            label: self.label(text),
            justification,
        }
    }
}

impl Default for ImpactClassifier {
    fn default() -> Self {
        Self::from_config(&DigestConfig::default())
    }
}
