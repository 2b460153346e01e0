use crate::answers::AnswerSet;
use crate::inventory::{Inventory, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contribution {
    pub question_id: u32,
    pub value: u8,
    pub points: u32,
    pub reversed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub contributions: Vec<Contribution>,
    pub skipped: Vec<u32>,
    pub total: u32,
}

impl ScoreBreakdown {
    pub fn reversed_count(&self) -> usize {
        self.contributions.iter().filter(|c| c.reversed).count()
    }
}

/// Reverse items count `max_option_value + 1 - value`.
pub fn item_points(question: &Question, value: u8, max_option_value: u8) -> u32 {
    if question.is_reverse {
        (max_option_value as u32 + 1).saturating_sub(value as u32)
    } else {
        value as u32
    }
}

/// Scores every answered item on the inventory's option scale. Answers whose id is
/// not in the bank are skipped and listed in `skipped`; partial sets give partial sums.
pub fn score_breakdown(answers: &AnswerSet, inventory: &Inventory) -> ScoreBreakdown {
    let questions = inventory.questions();
    let max_option_value = inventory.max_option_value();
    let mut breakdown = ScoreBreakdown::default();

    for question in questions {
        if let Some(value) = answers.get(question.id) {
            let points = item_points(question, value, max_option_value);
            breakdown.total += points;
            breakdown.contributions.push(Contribution {
                question_id: question.id,
                value,
                points,
                reversed: question.is_reverse,
            });
        }
    }

    breakdown.skipped = answers
        .iter()
        .map(|(id, _)| id)
        .filter(|id| !questions.iter().any(|q| q.id == *id))
        .collect();

    breakdown
}

pub fn compute_score(answers: &AnswerSet, inventory: &Inventory) -> u32 {
    score_breakdown(answers, inventory).total
}
