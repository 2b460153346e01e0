//! Step-by-step controller for one assessment session.
//!
//! Every operation returns `true` when it changed state and `false` when a guard
//! rejected it. Rejections are silent. Surfaces run their own side effects (clearing
//! the screen, scrolling) only after a `true`.

use crate::answers::AnswerSet;
use crate::assessment::AssessmentResult;
use crate::inventory::{Inventory, Question, ScoreBand};
use crate::scoring::{classify, compute_score};
use crate::share::{ShareMessage, ShareTarget};
use crate::sink::{ResultsSink, SaveOutcome};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Intro,
    Questioning(usize),
    Results,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.current * 100) / self.total).min(100) as u8
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    inventory: Inventory,
    step: Step,
    subject_name: String,
    answers: AnswerSet,
    result: Option<AssessmentResult>,
    save_status: SaveStatus,
    last_share: Option<ShareTarget>,
}

impl Wizard {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            step: Step::Intro,
            subject_name: String::new(),
            answers: AnswerSet::new(),
            result: None,
            save_status: SaveStatus::Idle,
            last_share: None,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn result(&self) -> Option<&AssessmentResult> {
        self.result.as_ref()
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    pub fn last_share(&self) -> Option<ShareTarget> {
        self.last_share
    }

    pub fn set_subject_name(&mut self, name: &str) -> bool {
        if self.step != Step::Intro {
            return false;
        }
        self.subject_name = name.to_string();
        true
    }

    pub fn start(&mut self) -> bool {
        if self.step != Step::Intro || self.subject_name.trim().is_empty() {
            return false;
        }
        self.step = Step::Questioning(0);
        tracing::debug!(subject = %self.subject_name.trim(), "assessment started");
        true
    }

    pub fn current_question(&self) -> Option<&'static Question> {
        match self.step {
            Step::Questioning(index) => self.inventory.questions().get(index),
            _ => None,
        }
    }

    pub fn current_answer(&self) -> Option<u8> {
        self.current_question()
            .and_then(|question| self.answers.get(question.id))
    }

    pub fn is_last_question(&self) -> bool {
        matches!(self.step, Step::Questioning(index) if index + 1 == self.inventory.questions().len())
    }

    pub fn progress(&self) -> Option<Progress> {
        match self.step {
            Step::Questioning(index) => Some(Progress {
                current: index + 1,
                total: self.inventory.questions().len(),
            }),
            _ => None,
        }
    }

    /// Answers the question on screen. Never advances.
    pub fn record_answer(&mut self, value: u8) -> bool {
        match self.current_question() {
            Some(question) => self.record_answer_for(question.id, value),
            None => false,
        }
    }

    pub fn record_answer_for(&mut self, question_id: u32, value: u8) -> bool {
        if !matches!(self.step, Step::Questioning(_))
            || self.inventory.question(question_id).is_none()
            || !self.inventory.is_valid_value(value)
        {
            return false;
        }
        self.answers.record(question_id, value);
        true
    }

    pub fn next(&mut self) -> bool {
        let Step::Questioning(index) = self.step else {
            return false;
        };
        if self.current_answer().is_none() {
            return false;
        }

        if index + 1 >= self.inventory.questions().len() {
            self.finish();
        } else {
            self.step = Step::Questioning(index + 1);
        }
        true
    }

    pub fn prev(&mut self) -> bool {
        match self.step {
            Step::Questioning(index) if index > 0 => {
                self.step = Step::Questioning(index - 1);
                true
            }
            _ => false,
        }
    }

    /// Leaves a running questionnaire. Answers are dropped so a later start begins clean.
    pub fn abandon(&mut self) -> bool {
        if !matches!(self.step, Step::Questioning(_)) {
            return false;
        }
        self.answers.clear();
        self.step = Step::Intro;
        tracing::debug!("assessment abandoned");
        true
    }

    pub fn restart(&mut self) -> bool {
        if self.step != Step::Results {
            return false;
        }
        self.answers.clear();
        self.result = None;
        self.save_status = SaveStatus::Idle;
        self.last_share = None;
        self.step = Step::Intro;
        true
    }

    /// Live total over whatever has been answered so far.
    pub fn score(&self) -> u32 {
        compute_score(&self.answers, &self.inventory)
    }

    pub fn band(&self) -> &'static ScoreBand {
        classify(self.score(), self.inventory.bands())
    }

    fn finish(&mut self) {
        let result = AssessmentResult::new(
            &self.subject_name,
            self.answers.clone(),
            &self.inventory,
            Utc::now(),
        );
        tracing::info!(
            score = result.total_score,
            band = %result.band_label,
            "assessment completed"
        );
        self.result = Some(result);
        self.step = Step::Results;
    }

    /// Marks a save as in flight and hands back the result to persist. `None` while
    /// another save is outstanding, after a successful save, or outside the results step.
    pub fn begin_save(&mut self) -> Option<AssessmentResult> {
        if self.step != Step::Results {
            return None;
        }
        if matches!(self.save_status, SaveStatus::Saving | SaveStatus::Saved) {
            return None;
        }
        let result = self.result.clone()?;
        self.save_status = SaveStatus::Saving;
        Some(result)
    }

    pub fn finish_save(&mut self, outcome: SaveOutcome) -> bool {
        if self.save_status != SaveStatus::Saving {
            return false;
        }
        self.save_status = match outcome {
            SaveOutcome::Saved => SaveStatus::Saved,
            SaveOutcome::Failed { reason } => SaveStatus::Failed(reason),
        };
        true
    }

    pub async fn save<S: ResultsSink>(&mut self, sink: &S) -> bool {
        let Some(result) = self.begin_save() else {
            return false;
        };
        let outcome = sink.persist(&result).await;
        self.finish_save(outcome)
    }

    /// Builds the share payload for `target` and remembers the choice.
    pub fn share(&mut self, target: ShareTarget, base_url: &str) -> Option<String> {
        let result = self.result.as_ref()?;
        let message = ShareMessage::new(result, base_url, self.inventory.max_score());
        self.last_share = Some(target);
        Some(message.payload(target))
    }
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new(Inventory::hamilton())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{AnswerOption, Severity, QUESTIONS, SCORE_BANDS};
    use std::cell::Cell;

    struct FailingSink {
        calls: Cell<usize>,
    }

    impl ResultsSink for FailingSink {
        async fn probe_connectivity(&self) -> bool {
            false
        }

        async fn persist(&self, _result: &AssessmentResult) -> SaveOutcome {
            self.calls.set(self.calls.get() + 1);
            SaveOutcome::Failed {
                reason: "store offline".into(),
            }
        }
    }

    struct RecordingSink {
        saved: std::sync::Mutex<Vec<AssessmentResult>>,
    }

    impl ResultsSink for RecordingSink {
        async fn probe_connectivity(&self) -> bool {
            true
        }

        async fn persist(&self, result: &AssessmentResult) -> SaveOutcome {
            self.saved.lock().unwrap().push(result.clone());
            SaveOutcome::Saved
        }
    }

    fn started() -> Wizard {
        let mut wizard = Wizard::default();
        wizard.set_subject_name("Ana");
        assert!(wizard.start());
        wizard
    }

    fn answer_all(wizard: &mut Wizard, value_for: impl Fn(&Question) -> u8) {
        while let Some(question) = wizard.current_question() {
            assert!(wizard.record_answer(value_for(question)));
            assert!(wizard.next());
        }
    }

    fn completed() -> Wizard {
        let mut wizard = started();
        answer_all(&mut wizard, |_| 3);
        assert_eq!(wizard.step(), Step::Results);
        wizard
    }

    #[test]
    fn test_start_requires_name() {
        let mut wizard = Wizard::default();
        assert!(!wizard.start());
        assert_eq!(wizard.step(), Step::Intro);

        wizard.set_subject_name("   ");
        assert!(!wizard.start());
        assert_eq!(wizard.step(), Step::Intro);

        wizard.set_subject_name("Ana");
        assert!(wizard.start());
        assert_eq!(wizard.step(), Step::Questioning(0));
        assert!(!wizard.set_subject_name("Otra"));
        assert_eq!(wizard.subject_name(), "Ana");
    }

    #[test]
    fn test_next_requires_answer() {
        let mut wizard = started();
        assert!(!wizard.next());
        assert_eq!(wizard.step(), Step::Questioning(0));

        assert!(wizard.record_answer(2));
        assert_eq!(wizard.step(), Step::Questioning(0));
        assert!(wizard.next());
        assert_eq!(wizard.step(), Step::Questioning(1));
    }

    #[test]
    fn test_record_answer_overwrites_and_validates() {
        let mut wizard = started();
        assert!(wizard.record_answer(1));
        assert!(wizard.record_answer(4));
        assert_eq!(wizard.current_answer(), Some(4));
        assert_eq!(wizard.answers().len(), 1);

        assert!(!wizard.record_answer(0));
        assert!(!wizard.record_answer(5));
        assert!(!wizard.record_answer_for(99, 2));
        assert_eq!(wizard.current_answer(), Some(4));
    }

    #[test]
    fn test_record_answer_outside_questioning() {
        let mut wizard = Wizard::default();
        assert!(!wizard.record_answer(2));
        assert!(!wizard.record_answer_for(1, 2));
        assert!(wizard.answers().is_empty());
    }

    #[test]
    fn test_prev_keeps_answers() {
        let mut wizard = started();
        assert!(!wizard.prev());
        assert_eq!(wizard.step(), Step::Questioning(0));

        wizard.record_answer(3);
        wizard.next();
        wizard.record_answer(1);
        assert!(wizard.prev());
        assert_eq!(wizard.step(), Step::Questioning(0));
        assert_eq!(wizard.current_answer(), Some(3));
        assert_eq!(wizard.answers().get(2), Some(1));
    }

    #[test]
    fn test_last_question_enters_results() {
        let mut wizard = started();
        for _ in 0..19 {
            wizard.record_answer(1);
            wizard.next();
        }
        assert_eq!(wizard.step(), Step::Questioning(19));
        assert!(wizard.is_last_question());
        assert!(wizard.record_answer(1));
        assert!(wizard.next());
        assert_eq!(wizard.step(), Step::Results);
        assert!(wizard.result().is_some());
        assert!(!wizard.next());
        assert!(!wizard.prev());
    }

    #[test]
    fn test_progress() {
        let mut wizard = started();
        let progress = wizard.progress().unwrap();
        assert_eq!((progress.current, progress.total), (1, 20));
        assert_eq!(progress.percent(), 5);

        for _ in 0..9 {
            wizard.record_answer(2);
            wizard.next();
        }
        assert_eq!(wizard.progress().unwrap().percent(), 50);
        assert_eq!(Wizard::default().progress(), None);
    }

    #[test]
    fn test_live_score() {
        let mut wizard = started();
        assert_eq!(wizard.score(), 0);
        wizard.record_answer(4);
        assert_eq!(wizard.score(), 4);
        assert!(wizard.record_answer_for(5, 4));
        assert_eq!(wizard.score(), 5);
        assert_eq!(wizard.band().severity, Severity::Normal);
    }

    #[test]
    fn test_minimum_and_maximum_sessions() {
        let mut low = started();
        answer_all(&mut low, |q| if q.is_reverse { 4 } else { 1 });
        let result = low.result().unwrap();
        assert_eq!(result.total_score, 20);
        assert_eq!(result.severity, Severity::Moderate);
        assert_eq!(result.subject_name, "Ana");

        let mut high = started();
        answer_all(&mut high, |q| if q.is_reverse { 1 } else { 4 });
        let result = high.result().unwrap();
        assert_eq!(result.total_score, 80);
        assert_eq!(result.severity, Severity::ExtremelySevere);
    }

    #[test]
    fn test_abandon_clears_answers() {
        let mut wizard = started();
        wizard.record_answer(2);
        wizard.next();
        assert!(wizard.abandon());
        assert_eq!(wizard.step(), Step::Intro);
        assert!(wizard.answers().is_empty());
        assert_eq!(wizard.subject_name(), "Ana");

        assert!(!wizard.abandon());
        assert!(wizard.start());
        assert_eq!(wizard.step(), Step::Questioning(0));
    }

    #[test]
    fn test_restart_clears_session() {
        let mut wizard = completed();
        assert!(!wizard.abandon());
        wizard.share(ShareTarget::CopyLink, "https://x.example/");
        wizard.begin_save();
        wizard.finish_save(SaveOutcome::Saved);

        assert!(wizard.restart());
        assert_eq!(wizard.step(), Step::Intro);
        assert!(wizard.answers().is_empty());
        assert!(wizard.result().is_none());
        assert_eq!(wizard.save_status(), &SaveStatus::Idle);
        assert_eq!(wizard.last_share(), None);
        assert!(!wizard.restart());
    }

    #[test]
    fn test_save_in_flight_guard() {
        let mut wizard = started();
        assert!(wizard.begin_save().is_none());

        let mut wizard = completed();
        let first = wizard.begin_save();
        assert!(first.is_some());
        assert_eq!(wizard.save_status(), &SaveStatus::Saving);
        assert!(wizard.begin_save().is_none());

        assert!(wizard.finish_save(SaveOutcome::Saved));
        assert_eq!(wizard.save_status(), &SaveStatus::Saved);
        assert!(wizard.begin_save().is_none());
        assert!(!wizard.finish_save(SaveOutcome::Saved));
    }

    #[tokio::test]
    async fn test_failed_save_is_retryable() {
        let sink = FailingSink {
            calls: Cell::new(0),
        };
        let mut wizard = completed();
        let score = wizard.result().unwrap().total_score;

        assert!(wizard.save(&sink).await);
        assert_eq!(
            wizard.save_status(),
            &SaveStatus::Failed("store offline".into())
        );
        assert_eq!(wizard.result().unwrap().total_score, score);

        assert!(wizard.save(&sink).await);
        assert_eq!(sink.calls.get(), 2);
        assert!(!matches!(wizard.save_status(), SaveStatus::Saved));
    }

    #[tokio::test]
    async fn test_successful_save_is_not_repeated() {
        let sink = RecordingSink {
            saved: std::sync::Mutex::new(Vec::new()),
        };
        let mut wizard = completed();

        assert!(wizard.save(&sink).await);
        assert!(!wizard.save(&sink).await);
        assert_eq!(wizard.save_status(), &SaveStatus::Saved);

        let saved = sink.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].answers.len(), 20);
    }

    #[test]
    fn test_share_only_in_results() {
        let mut wizard = started();
        assert!(wizard.share(ShareTarget::WhatsApp, "https://x.example/").is_none());

        let mut wizard = completed();
        let link = wizard
            .share(ShareTarget::WhatsApp, "https://x.example/")
            .unwrap();
        assert!(link.starts_with("https://wa.me/?text="));
        assert_eq!(wizard.last_share(), Some(ShareTarget::WhatsApp));
        assert_eq!(
            wizard.share(ShareTarget::CopyLink, "https://x.example/").as_deref(),
            Some("https://x.example/")
        );
    }

    #[test]
    fn test_live_score_uses_inventory_scale() {
        const FIVE_OPTIONS: &[AnswerOption] = &[
            AnswerOption { value: 1, label: "Nunca" },
            AnswerOption { value: 2, label: "Raramente" },
            AnswerOption { value: 3, label: "Algunas veces" },
            AnswerOption { value: 4, label: "Muchas veces" },
            AnswerOption { value: 5, label: "Siempre" },
        ];
        let inventory = Inventory::new(QUESTIONS, FIVE_OPTIONS, SCORE_BANDS).unwrap();
        let mut wizard = Wizard::new(inventory);
        wizard.set_subject_name("Ana");
        assert!(wizard.start());

        // question 5 is reverse-scored
        assert!(wizard.record_answer_for(5, 1));
        assert_eq!(wizard.score(), 5);
        assert!(wizard.record_answer_for(5, 5));
        assert_eq!(wizard.score(), 1);
    }
}
