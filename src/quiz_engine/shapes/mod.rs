//! One module per question shape.
//!
//! Every generator has the same signature:
//!
//! ```ignore
//! pub fn generate<R: Rng>(
//!     rng: &mut R,
//!     store: &ContentStore,
//!     record: &DiagnosisRecord,
//!     config: &QuizConfig,
//!     question_id: String,
//! ) -> QuizResult<QuestionInstance>
//! ```
//!
//! `generator.rs` picks the diagnosis and dispatches here.

/// (a) SD-
pub mod symptoms_to_diagnosis;
/// (b) FD-
pub mod finding_to_diagnosis;
/// (c) SU-
pub mod symptoms_to_urgency;
