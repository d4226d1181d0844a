//! Hallucination report types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of hallucination a finding points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    UnsupportedClaim,
    Contradiction,
    FabricatedFact,
    Exaggeration,
    CitationIssue,
}

impl FindingCategory {
    pub const ALL: [FindingCategory; 5] = [
        Self::UnsupportedClaim,
        Self::Contradiction,
        Self::FabricatedFact,
        Self::Exaggeration,
        Self::CitationIssue,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::UnsupportedClaim => "Unsupported claims",
            Self::Contradiction => "Contradictions",
            Self::FabricatedFact => "Fabricated facts",
            Self::Exaggeration => "Exaggerations",
            Self::CitationIssue => "Citation issues",
        }
    }
}

/// One flagged answer sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub sentence: String,
    pub category: FindingCategory,
    /// Context sentence backing the finding, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_snippet: Option<String>,
    /// Phrase, fact or term that triggered the finding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_text: Option<String>,
}

impl Finding {
    pub fn new(sentence: impl Into<String>, category: FindingCategory) -> Self {
        Self {
            sentence: sentence.into(),
            category,
            evidence_snippet: None,
            matched_text: None,
        }
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence_snippet = Some(evidence.into());
        self
    }

    pub fn with_matched(mut self, matched: impl Into<String>) -> Self {
        self.matched_text = Some(matched.into());
        self
    }
}

/// Flagged fraction of eligible sentences, per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub unsupported_claim: f32,
    pub contradiction: f32,
    pub fabricated_fact: f32,
    pub exaggeration: f32,
    pub citation_issue: f32,
}

impl CategoryScores {
    pub fn get(&self, category: FindingCategory) -> f32 {
        match category {
            FindingCategory::UnsupportedClaim => self.unsupported_claim,
            FindingCategory::Contradiction => self.contradiction,
            FindingCategory::FabricatedFact => self.fabricated_fact,
            FindingCategory::Exaggeration => self.exaggeration,
            FindingCategory::CitationIssue => self.citation_issue,
        }
    }
}

/// Result of hallucination detection over one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallucinationReport {
    pub findings: Vec<Finding>,
    pub category_scores: CategoryScores,
    pub confidence_score: f32,
    pub overall_hallucination_risk: f32,
    pub is_hallucination_likely: bool,
}

impl HallucinationReport {
    /// Report with no findings and zero risk
    pub fn clean() -> Self {
        Self {
            findings: Vec::new(),
            category_scores: CategoryScores::default(),
            confidence_score: 1.0,
            overall_hallucination_risk: 0.0,
            is_hallucination_likely: false,
        }
    }

    pub fn findings_in(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }
}

impl fmt::Display for HallucinationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Hallucination Analysis Report")?;
        writeln!(
            f,
            "Overall risk: {:.1}%",
            self.overall_hallucination_risk * 100.0
        )?;
        writeln!(
            f,
            "Status: {}",
            if self.is_hallucination_likely {
                "LIKELY HALLUCINATION"
            } else {
                "No significant hallucination detected"
            }
        )?;

        if self.findings.is_empty() {
            writeln!(f, "No findings")?;
        }

        for category in FindingCategory::ALL {
            let findings: Vec<&Finding> = self.findings_in(category).collect();
            if findings.is_empty() {
                continue;
            }

            writeln!(
                f,
                "{} ({}, score {:.2}):",
                category.label(),
                findings.len(),
                self.category_scores.get(category)
            )?;
            for finding in findings {
                match &finding.matched_text {
                    Some(matched) => writeln!(f, "  - {} [{}]", finding.sentence, matched)?,
                    None => writeln!(f, "  - {}", finding.sentence)?,
                }
                if let Some(evidence) = &finding.evidence_snippet {
                    writeln!(f, "    context: {}", evidence)?;
                }
            }
        }

        write!(f, "Confidence: {:.1}%", self.confidence_score * 100.0)
    }
}
