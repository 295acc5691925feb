//! Decision classification over a computed score breakdown.

use crate::models::{Confidence, Decision};
use crate::policy::DecisionPolicy;

/// Derives confidence from data completeness.
///
/// Every missing or malformed scoring input records a concern, so an
/// empty concern list is exactly the "no required field was missing"
/// condition. Confidence never looks at the score magnitude.
pub fn derive_confidence(scoring_concerns: &[String]) -> Confidence {
    if scoring_concerns.is_empty() {
        Confidence::High
    } else {
        Confidence::Low
    }
}

/// Classifies a total score into a decision.
///
/// Cutoff semantics are fixed: the qualify threshold is inclusive and
/// requires high confidence; the disqualify floor is exclusive and
/// confidence cannot override it; everything in between, including a
/// high total with low confidence, lands in review.
pub fn classify(total: u8, confidence: Confidence, policy: &DecisionPolicy) -> Decision {
    if total >= policy.qualify_threshold && confidence == Confidence::High {
        Decision::Qualified
    } else if total < policy.disqualify_below {
        Decision::NotQualified
    } else {
        Decision::NeedsReview
    }
}
