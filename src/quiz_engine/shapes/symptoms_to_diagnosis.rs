use rand::Rng;

use crate::quiz_engine::{
    config::QuizConfig,
    content::ContentStore,
    error::QuizResult,
    helpers::{pick_distractors, question, sample_symptoms, shuffled_options},
    models::{DiagnosisRecord, QuestionInstance, QuestionShape},
};

pub fn generate<R: Rng>(
    rng: &mut R,
    store: &ContentStore,
    record: &DiagnosisRecord,
    config: &QuizConfig,
    question_id: String,
) -> QuizResult<QuestionInstance> {
    let symptoms = sample_symptoms(record, config.symptom_sample, rng);
    let prompt = format!(
        "A patient presents with {}. The most likely diagnosis is:",
        symptoms.join(", ")
    );

    let distractors = pick_distractors(store, record, config.distractor_count, rng)?;
    let options = shuffled_options(&record.name, &distractors, rng);

    Ok(question(
        question_id,
        QuestionShape::SymptomsToDiagnosis,
        record,
        prompt,
        options,
        record.name.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn prompt_quotes_sampled_symptoms() {
        let store = ContentStore::bundled().unwrap();
        let record = store.record("Angle Closure Glaucoma").unwrap();
        let mut rng = StdRng::seed_from_u64(21);
        let q = generate(&mut rng, &store, record, &QuizConfig::default(), "SD-0".into()).unwrap();

        let quoted = record.symptoms.iter().filter(|s| q.prompt.contains(s.as_str())).count();
        assert_eq!(quoted, 2, "prompt: {}", q.prompt);
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.correct_answer, "Angle Closure Glaucoma");
    }

    #[test]
    fn single_symptom_record_does_not_fail() {
        let store = ContentStore::bundled().unwrap();
        let record = store.record("Macular Degeneration (Dry)").unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let q = generate(&mut rng, &store, record, &QuizConfig::default(), "SD-0".into()).unwrap();
        assert!(q.prompt.contains("gradual central vision loss"));
    }
}
