//! Quality metric types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bands of the overall quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    VeryPoor,
}

impl QualityLevel {
    /// Band for an overall score
    pub fn from_score(score: f32) -> Self {
        if score >= 0.85 {
            Self::Excellent
        } else if score >= 0.70 {
            Self::Good
        } else if score >= 0.60 {
            Self::Fair
        } else if score >= 0.40 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::VeryPoor => "very_poor",
        }
    }
}

impl fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The four quality dimensions, in their fixed reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Completeness,
    Specificity,
    Relevance,
    Confidence,
}

impl QualityDimension {
    pub const ALL: [QualityDimension; 4] = [
        Self::Completeness,
        Self::Specificity,
        Self::Relevance,
        Self::Confidence,
    ];

    /// Fixed suggestion emitted when this dimension scores low
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Completeness => {
                "Provide a more complete answer that covers every part of the question"
            }
            Self::Specificity => {
                "Include specific details such as names, numbers, dates or quoted terms"
            }
            Self::Relevance => "Focus the answer on the question and the retrieved documents",
            Self::Confidence => "Reduce hedging language and state supported facts directly",
        }
    }
}

/// Multi-dimensional quality assessment of one answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub completeness: f32,
    pub specificity: f32,
    pub relevance: f32,
    pub confidence: f32,
    pub overall_score: f32,
    pub quality_level: QualityLevel,
    pub needs_fallback: bool,
    pub recommendations: Vec<String>,
}

impl QualityMetrics {
    /// Metrics of an answer that cannot be assessed at all
    pub fn zero() -> Self {
        Self {
            completeness: 0.0,
            specificity: 0.0,
            relevance: 0.0,
            confidence: 0.0,
            overall_score: 0.0,
            quality_level: QualityLevel::VeryPoor,
            needs_fallback: true,
            recommendations: QualityDimension::ALL
                .iter()
                .map(|d| d.recommendation().to_string())
                .collect(),
        }
    }

    /// Score of a single dimension
    pub fn dimension(&self, dimension: QualityDimension) -> f32 {
        match dimension {
            QualityDimension::Completeness => self.completeness,
            QualityDimension::Specificity => self.specificity,
            QualityDimension::Relevance => self.relevance,
            QualityDimension::Confidence => self.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_bands() {
        assert_eq!(QualityLevel::from_score(0.9), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(0.85), QualityLevel::Excellent);
        assert_eq!(QualityLevel::from_score(0.7), QualityLevel::Good);
        assert_eq!(QualityLevel::from_score(0.6), QualityLevel::Fair);
        assert_eq!(QualityLevel::from_score(0.59), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_score(0.4), QualityLevel::Poor);
        assert_eq!(QualityLevel::from_score(0.39), QualityLevel::VeryPoor);
        assert_eq!(QualityLevel::from_score(0.0), QualityLevel::VeryPoor);
    }

    #[test]
    fn test_zero_metrics() {
        let metrics = QualityMetrics::zero();

        assert_eq!(metrics.overall_score, 0.0);
        assert_eq!(metrics.quality_level, QualityLevel::VeryPoor);
        assert!(metrics.needs_fallback);
        assert_eq!(metrics.recommendations.len(), 4);
    }

    #[test]
    fn test_level_serializes_snake_case() {
        let json = serde_json::to_string(&QualityLevel::VeryPoor).unwrap();
        assert_eq!(json, "\"very_poor\"");
    }
}
