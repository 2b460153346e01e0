use crate::inventory::Inventory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("question {0} is not part of the inventory")]
    UnknownQuestion(u32),
    #[error("value {value} for question {question} is not an answer option")]
    InvalidValue { question: u32, value: u8 },
    #[error("cannot parse answer '{0}'")]
    Malformed(String),
    #[error("expected {expected} positional answers, got {got}")]
    WrongCount { expected: usize, got: usize },
    #[error("no answers given")]
    Empty,
}

/// Selected option value per question id. Last write wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<u32, u8>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any earlier value and returns it.
    pub fn record(&mut self, question_id: u32, value: u8) -> Option<u8> {
        self.0.insert(question_id, value)
    }

    pub fn get(&self, question_id: u32) -> Option<u8> {
        self.0.get(&question_id).copied()
    }

    pub fn contains(&self, question_id: u32) -> bool {
        self.0.contains_key(&question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.0.iter().map(|(id, value)| (*id, *value))
    }

    pub fn is_complete(&self, inventory: &Inventory) -> bool {
        inventory.questions().iter().all(|q| self.contains(q.id))
    }

    pub fn validate(&self, inventory: &Inventory) -> Result<(), AnswerError> {
        for (question, value) in self.iter() {
            if inventory.question(question).is_none() {
                return Err(AnswerError::UnknownQuestion(question));
            }
            if !inventory.is_valid_value(value) {
                return Err(AnswerError::InvalidValue { question, value });
            }
        }
        Ok(())
    }

    /// Parses either one value per question in bank order (`4,1,2,...`) or explicit
    /// `id=value` pairs. Commas and whitespace both separate tokens.
    pub fn parse(input: &str, inventory: &Inventory) -> Result<Self, AnswerError> {
        let tokens: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(AnswerError::Empty);
        }

        let mut answers = AnswerSet::new();

        if tokens.iter().any(|t| t.contains('=')) {
            for token in tokens {
                let (id, value) = token
                    .split_once('=')
                    .ok_or_else(|| AnswerError::Malformed(token.to_string()))?;
                let id: u32 = id
                    .trim()
                    .parse()
                    .map_err(|_| AnswerError::Malformed(token.to_string()))?;
                let value: u8 = value
                    .trim()
                    .parse()
                    .map_err(|_| AnswerError::Malformed(token.to_string()))?;
                answers.record(id, value);
            }
        } else {
            let questions = inventory.questions();
            if tokens.len() != questions.len() {
                return Err(AnswerError::WrongCount {
                    expected: questions.len(),
                    got: tokens.len(),
                });
            }
            for (question, token) in questions.iter().zip(tokens) {
                let value: u8 = token
                    .parse()
                    .map_err(|_| AnswerError::Malformed(token.to_string()))?;
                answers.record(question.id, value);
            }
        }

        answers.validate(inventory)?;
        Ok(answers)
    }
}

impl FromIterator<(u32, u8)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (u32, u8)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
