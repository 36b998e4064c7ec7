use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::quiz_engine::{
    config::QuizConfig,
    content::ContentStore,
    error::{QuizError, QuizResult},
    helpers::make_question_id,
    ledger::UserLedger,
    models::{QuestionInstance, QuestionShape, QuizMode, QuizRequest},
    policy::{CategoryPolicy, UniformPolicy, WeakestCategoryPolicy},
    shapes,
};

/// Seeded RNG for a request; `None` draws from entropy.
pub fn request_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

fn select_category<R: Rng>(
    store: &ContentStore,
    policy: &dyn CategoryPolicy,
    ledger: Option<&UserLedger>,
    mode: &QuizMode,
    rng: &mut R,
) -> QuizResult<String> {
    match mode {
        QuizMode::Adaptive => policy.select_category(store, ledger, rng),
        QuizMode::Random => UniformPolicy.select_category(store, ledger, rng),
        QuizMode::Focused(category) if store.has_category(category) => Ok(category.clone()),
        QuizMode::Focused(category) => Err(QuizError::CategoryNotFound(category.clone())),
    }
}

/// Core dispatch: category, then diagnosis, then shape.
pub fn generate_question<R: Rng>(
    rng: &mut R,
    store: &ContentStore,
    config: &QuizConfig,
    policy: &dyn CategoryPolicy,
    ledger: Option<&UserLedger>,
    mode: &QuizMode,
    shape: Option<QuestionShape>,
) -> QuizResult<QuestionInstance> {
    if store.is_empty() {
        return Err(QuizError::EmptyContentStore);
    }

    let category = select_category(store, policy, ledger, mode, rng)?;
    let name = store
        .by_category(&category)
        .choose(rng)
        .copied()
        .ok_or_else(|| QuizError::CategoryNotFound(category.clone()))?;
    let record = store.record(name)?;

    let shape = match shape {
        Some(shape) => shape,
        None => *QuestionShape::ALL.choose(rng).ok_or(QuizError::EmptyContentStore)?,
    };
    let question_id = make_question_id(shape, rng);

    tracing::debug!(%question_id, category = %category, diagnosis = name, %shape, "generating question");

    match shape {
        QuestionShape::SymptomsToDiagnosis =>
            shapes::symptoms_to_diagnosis::generate(rng, store, record, config, question_id),

        QuestionShape::FindingToDiagnosis =>
            shapes::finding_to_diagnosis::generate(rng, store, record, config, question_id),

        QuestionShape::SymptomsToUrgency =>
            shapes::symptoms_to_urgency::generate(rng, store, record, config, question_id),
    }
}

/// One-shot generation with default tuning and the weakest-category policy.
///
/// Pass the user's ledger to get adaptive targeting; `None` behaves like a
/// brand-new user.
pub fn generate(
    store: &ContentStore,
    ledger: Option<&UserLedger>,
    request: &QuizRequest,
) -> QuizResult<QuestionInstance> {
    let config = QuizConfig::default();
    let policy = WeakestCategoryPolicy::from_config(&config);
    let mut rng = request_rng(request.rng_seed);
    generate_question(&mut rng, store, &config, &policy, ledger, &request.mode, request.shape)
}
