//! Per-client session controller.
//!
//! A [`QuizSession`] owns the "current user", "current mode" and "current
//! question" for one connected client. The content store and ledger are
//! injected, so any number of sessions can share them.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::quiz_engine::{
    config::QuizConfig,
    content::ContentStore,
    error::{QuizError, QuizResult},
    generator::{generate_question, request_rng},
    ledger::{CategoryReport, SharedLedger},
    models::{QuestionInstance, QuestionShape, QuizMode, UserId},
    policy::{CategoryPolicy, WeakestCategoryPolicy},
};

/// Result of answering the current question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub selected: String,
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub teaching_points: Vec<String>,
    /// False for anonymous sessions, whose answers are not tracked.
    pub recorded: bool,
}

/// Progress summary for the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub user: UserId,
    pub total_attempts: u32,
    pub overall_accuracy: f64,
    pub categories: Vec<CategoryReport>,
    pub weak_categories: Vec<String>,
}

pub struct QuizSession {
    store: Arc<ContentStore>,
    ledger: SharedLedger,
    config: QuizConfig,
    policy: Box<dyn CategoryPolicy>,
    rng: StdRng,
    user: Option<UserId>,
    mode: QuizMode,
    current: Option<QuestionInstance>,
}

impl QuizSession {
    /// Anonymous session in adaptive mode using [`WeakestCategoryPolicy`].
    pub fn new(store: Arc<ContentStore>, ledger: SharedLedger, config: QuizConfig) -> Self {
        let policy = WeakestCategoryPolicy::from_config(&config);
        Self {
            store,
            ledger,
            config,
            policy: Box::new(policy),
            rng: request_rng(None),
            user: None,
            mode: QuizMode::default(),
            current: None,
        }
    }

    pub fn with_policy(mut self, policy: impl CategoryPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Make every subsequent question reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = request_rng(Some(seed));
        self
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn mode(&self) -> &QuizMode {
        &self.mode
    }

    pub fn current_question(&self) -> Option<&QuestionInstance> {
        self.current.as_ref()
    }

    /// Switch to `raw` (normalized). Any pending question is dropped.
    pub fn login(&mut self, raw: &str) -> QuizResult<&UserId> {
        let user_id = UserId::new(raw)?;
        tracing::info!(user = %user_id, "session login");
        self.current = None;
        Ok(&*self.user.insert(user_id))
    }

    pub fn logout(&mut self) {
        if let Some(user_id) = self.user.take() {
            tracing::info!(user = %user_id, "session logout");
        }
        self.current = None;
    }

    pub fn set_mode(&mut self, mode: QuizMode) -> QuizResult<()> {
        if let QuizMode::Focused(category) = &mode {
            if !self.store.has_category(category) {
                return Err(QuizError::CategoryNotFound(category.clone()));
            }
        }
        self.mode = mode;
        Ok(())
    }

    /// Replace the current question with a fresh one.
    pub fn generate_question(&mut self, shape: Option<QuestionShape>) -> QuizResult<&QuestionInstance> {
        let snapshot = self.user.as_ref().and_then(|u| self.ledger.snapshot(u));
        let question = generate_question(
            &mut self.rng,
            &self.store,
            &self.config,
            self.policy.as_ref(),
            snapshot.as_ref(),
            &self.mode,
            shape,
        )?;
        Ok(&*self.current.insert(question))
    }

    /// Grade `selected` against the current question and record it.
    ///
    /// The question is consumed on success. An option that is not on offer
    /// leaves it in place.
    pub fn submit_answer(&mut self, selected: &str) -> QuizResult<AnswerOutcome> {
        let question = self.current.as_ref().ok_or(QuizError::NoActiveQuestion)?;
        if !question.has_option(selected) {
            return Err(QuizError::UnknownOption(selected.to_string()));
        }

        let is_correct = question.is_correct(selected);
        let recorded = match &self.user {
            Some(user_id) => {
                self.ledger
                    .record_attempt(user_id, &question.category, &question.diagnosis, is_correct)?;
                true
            }
            None => false,
        };

        let outcome = AnswerOutcome {
            selected: selected.to_string(),
            is_correct,
            correct_answer: question.correct_answer.clone(),
            explanation: question.explanation.clone(),
            teaching_points: question.teaching_points.clone(),
            recorded,
        };
        self.current = None;
        Ok(outcome)
    }

    pub fn reset_progress(&mut self) -> QuizResult<()> {
        let user_id = self.user.as_ref().ok_or(QuizError::NoActiveUser)?;
        self.ledger.reset(user_id);
        self.current = None;
        Ok(())
    }

    pub fn dashboard(&self) -> QuizResult<Dashboard> {
        let user_id = self.user.as_ref().ok_or(QuizError::NoActiveUser)?;
        let (min_attempts, threshold) = (self.config.weak_min_attempts, self.config.weak_threshold);
        let categories = self.ledger.report(user_id, min_attempts, threshold);
        let weak_categories = categories
            .iter()
            .filter(|r| r.is_weak)
            .map(|r| r.category.clone())
            .collect();
        Ok(Dashboard {
            user: user_id.clone(),
            total_attempts: self.ledger.total_attempts(user_id),
            overall_accuracy: self.ledger.accuracy(user_id, None),
            categories,
            weak_categories,
        })
    }
}
