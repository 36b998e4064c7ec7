//! Shared builders used by every question shape.
//!
//! Shapes only decide what goes in the prompt and which options compete; the
//! sampling, shuffling and final assembly live here.

use rand::{seq::SliceRandom, Rng, RngCore};

use crate::quiz_engine::{
    config::MAX_DISTRACTORS,
    content::ContentStore,
    error::{QuizError, QuizResult},
    models::{DiagnosisRecord, QuestionInstance, QuestionShape},
};

/// Build a question ID such as `SD-1A2B3C4D`.
pub fn make_question_id(shape: QuestionShape, rng: &mut impl RngCore) -> String {
    format!("{}-{:08X}", shape.id_prefix(), rng.next_u32())
}

/// Up to `n` symptoms, drawn without replacement in random order.
pub fn sample_symptoms<'a, R: Rng>(record: &'a DiagnosisRecord, n: usize, rng: &mut R) -> Vec<&'a str> {
    let mut picked: Vec<&str> = record
        .symptoms
        .choose_multiple(rng, n.min(record.symptoms.len()))
        .map(String::as_str)
        .collect();
    picked.shuffle(rng);
    picked
}

/// Wrong diagnosis names for `record`.
///
/// Drawn from the same category when it has at least `count` alternatives,
/// otherwise from the whole store. Fails if not even one alternative exists.
/// `count` is capped at [`MAX_DISTRACTORS`].
pub fn pick_distractors<'a, R: Rng>(
    store: &'a ContentStore,
    record: &DiagnosisRecord,
    count: usize,
    rng: &mut R,
) -> QuizResult<Vec<&'a str>> {
    let count = count.min(MAX_DISTRACTORS);
    let same_category: Vec<&str> = store
        .by_category(&record.category)
        .into_iter()
        .filter(|name| *name != record.name)
        .collect();

    let pool = if same_category.len() >= count {
        same_category
    } else {
        store
            .all_diagnoses()
            .into_iter()
            .filter(|name| *name != record.name)
            .collect()
    };

    if pool.is_empty() {
        return Err(QuizError::InsufficientDistractors {
            diagnosis: record.name.clone(),
        });
    }

    Ok(pool.choose_multiple(rng, count.min(pool.len())).copied().collect())
}

/// Correct answer plus distractors, shuffled.
pub fn shuffled_options<R: Rng>(correct: &str, others: &[&str], rng: &mut R) -> Vec<String> {
    let mut options: Vec<String> = std::iter::once(correct)
        .chain(others.iter().copied())
        .map(str::to_string)
        .collect();
    options.shuffle(rng);
    options
}

pub fn explanation(record: &DiagnosisRecord) -> String {
    format!(
        "{}: key finding is {}. Urgency: {}.",
        record.name, record.key_finding, record.urgency
    )
}

/// Assemble the final [`QuestionInstance`] from its parts.
pub fn question(
    id: String,
    shape: QuestionShape,
    record: &DiagnosisRecord,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
) -> QuestionInstance {
    QuestionInstance {
        question_id: id,
        shape,
        diagnosis: record.name.clone(),
        category: record.category.clone(),
        prompt,
        options,
        correct_answer,
        explanation: explanation(record),
        teaching_points: record.teaching.clone(),
    }
}
