//! Hallucination detection
//!
//! Answers are checked sentence by sentence against an index of the retrieved
//! context. Five passes (unsupported claims, contradictions, fabricated facts,
//! exaggerations and citation issues) each yield a flagged/eligible ratio that
//! is combined into one weighted risk.

mod detector;
mod facts;
mod report;

pub use detector::HallucinationDetector;
pub use facts::{extract_dates, extract_facts, ContextIndex, DateMention, Fact};
pub use report::{CategoryScores, Finding, FindingCategory, HallucinationReport};
