use rand::Rng;

use crate::quiz_engine::{
    config::QuizConfig,
    content::ContentStore,
    error::QuizResult,
    helpers::{pick_distractors, question, shuffled_options},
    models::{DiagnosisRecord, QuestionInstance, QuestionShape},
};

pub fn generate<R: Rng>(
    rng: &mut R,
    store: &ContentStore,
    record: &DiagnosisRecord,
    config: &QuizConfig,
    question_id: String,
) -> QuizResult<QuestionInstance> {
    let prompt = format!(
        "Examination reveals {}. Which diagnosis best explains this finding?",
        record.key_finding
    );

    let distractors = pick_distractors(store, record, config.distractor_count, rng)?;
    let options = shuffled_options(&record.name, &distractors, rng);

    Ok(question(
        question_id,
        QuestionShape::FindingToDiagnosis,
        record,
        prompt,
        options,
        record.name.clone(),
    ))
}
