//! Core quiz engine: content, performance tracking, and question generation.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: diagnosis records, urgency, user IDs, questions |
//! | `error`     | `QuizError` and the `QuizResult` alias |
//! | `config`    | Selection tuning (`QuizConfig`) |
//! | `content`   | Read-only diagnosis store, bundled dataset |
//! | `ledger`    | Per-user correct/total tallies by category and diagnosis |
//! | `policy`    | Category selection strategies (weakest-category, uniform) |
//! | `helpers`   | Sampling and assembly shared by all shapes |
//! | `generator` | `generate_question()`: category, diagnosis, shape dispatch |
//! | `shapes`    | One generator per question shape |
//! | `session`   | Per-client controller: login, generate, submit, reset |

pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod session;
pub mod shapes;

// Re-export the public API surface so callers can use
// `quiz_engine::generate` without reaching into sub-modules.
pub use config::QuizConfig;
pub use content::ContentStore;
pub use error::{QuizError, QuizResult};
pub use generator::{generate, generate_question};
pub use ledger::{CategoryReport, PerformanceLedger, SharedLedger, Tally, UserLedger};
pub use models::{
    DiagnosisRecord, QuestionInstance, QuestionShape, QuizMode, QuizRequest, Urgency,
    UrgencyLevel, UserId,
};
pub use policy::{CategoryPolicy, UniformPolicy, WeakestCategoryPolicy};
pub use session::{AnswerOutcome, Dashboard, QuizSession};
