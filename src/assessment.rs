use crate::answers::AnswerSet;
use crate::inventory::{Inventory, Severity};
use crate::scoring::{classify, compute_score};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A finished assessment, frozen when the wizard reaches its results step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentResult {
    pub subject_name: String,
    pub total_score: u32,
    pub band_label: String,
    pub severity: Severity,
    pub answers: AnswerSet,
    pub completed_at: DateTime<Utc>,
}

impl AssessmentResult {
    pub fn new(
        subject_name: &str,
        answers: AnswerSet,
        inventory: &Inventory,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let total_score = compute_score(&answers, inventory);
        let band = classify(total_score, inventory.bands());
        Self {
            subject_name: subject_name.trim().to_string(),
            total_score,
            band_label: band.label.to_string(),
            severity: band.severity,
            answers,
            completed_at,
        }
    }
}
