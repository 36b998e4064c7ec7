//! # ophtho_drill_gen
//!
//! An offline multiple-choice drill generator for ophthalmology trainees.
//!
//! The crate bundles a knowledge base of 45 diagnoses (symptoms, key exam
//! finding, urgency, subspecialty, teaching points), builds randomised
//! questions from it, and keeps a per-resident ledger of how well they do in
//! each subspecialty so the next question can target their weakest area.
//!
//! ## How it works
//!
//! 1. Load a [`ContentStore`]: usually [`ContentStore::bundled`], or your own
//!    JSON via [`ContentStore::from_json`].
//! 2. Pick a category. With no history (or fewer than five answers) this is
//!    uniform; afterwards a [`WeakestCategoryPolicy`] drills categories where
//!    accuracy is under 60% across at least three attempts.
//! 3. Pick a diagnosis in that category and one of three [`QuestionShape`]s:
//!    symptoms → diagnosis, key finding → diagnosis, or symptoms → urgency.
//! 4. The returned [`QuestionInstance`] carries shuffled options, the correct
//!    answer, an explanation and teaching points.
//! 5. Answers go through a [`QuizSession`], which updates the shared
//!    [`PerformanceLedger`].
//!
//! ## Key features
//!
//! - **Deterministic**: `rng_seed: Some(u64)` (or [`QuizSession::with_seed`])
//!   reproduces the same questions for the same ledger state.
//! - **Typed content**: urgency is an enum with a free-text qualifier; a bad
//!   record fails at load time, not mid-quiz.
//! - **Pluggable targeting**: implement [`CategoryPolicy`] to swap the
//!   weakest-category heuristic for something smarter.
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use ophtho_drill_gen::{ContentStore, QuizConfig, QuizSession, SharedLedger};
//!
//! let store = Arc::new(ContentStore::bundled()?);
//! let ledger = SharedLedger::for_store(&store);
//! let mut session = QuizSession::new(store, ledger, QuizConfig::default());
//!
//! session.login("Dr. Rivera")?;
//! let question = session.generate_question(None)?.clone();
//! println!("Q: {}", question.prompt);
//! for option in &question.options {
//!     println!("  - {option}");
//! }
//!
//! let outcome = session.submit_answer(&question.options[0])?;
//! println!("{}", outcome.explanation);
//! # Ok::<(), ophtho_drill_gen::QuizError>(())
//! ```

pub mod quiz_engine;

// Convenience re-exports so callers can use `ophtho_drill_gen::generate`
// directly without reaching into `quiz_engine::`.
pub use quiz_engine::{
    generate, AnswerOutcome, CategoryPolicy, CategoryReport, ContentStore, Dashboard,
    DiagnosisRecord, PerformanceLedger, QuestionInstance, QuestionShape, QuizConfig, QuizError,
    QuizMode, QuizRequest, QuizResult, QuizSession, SharedLedger, Tally, UniformPolicy,
    Urgency, UrgencyLevel, UserId, UserLedger, WeakestCategoryPolicy,
};
