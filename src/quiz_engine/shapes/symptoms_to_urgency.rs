use rand::{seq::SliceRandom, Rng};

use crate::quiz_engine::{
    config::QuizConfig,
    content::ContentStore,
    error::QuizResult,
    helpers::{question, sample_symptoms},
    models::{DiagnosisRecord, QuestionInstance, QuestionShape, UrgencyLevel},
};

pub fn generate<R: Rng>(
    rng: &mut R,
    _store: &ContentStore,
    record: &DiagnosisRecord,
    config: &QuizConfig,
    question_id: String,
) -> QuizResult<QuestionInstance> {
    let symptoms = sample_symptoms(record, config.symptom_sample, rng);
    let prompt = format!(
        "A patient presents with {}. How urgently does this need to be seen?",
        symptoms.join(", ")
    );

    let mut options: Vec<String> = UrgencyLevel::ALL.iter().map(|u| u.label().to_string()).collect();
    options.shuffle(rng);

    Ok(question(
        question_id,
        QuestionShape::SymptomsToUrgency,
        record,
        prompt,
        options,
        record.urgency.level.label().to_string(),
    ))
}
