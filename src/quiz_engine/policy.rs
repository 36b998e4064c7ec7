//! Category selection strategies.
//!
//! The generator asks a [`CategoryPolicy`] which category to draw from and
//! never looks at the ledger itself, so alternative strategies (recency
//! weighting, confidence bounds) plug in here.

use rand::{seq::SliceRandom, RngCore};

use crate::quiz_engine::{
    config::QuizConfig,
    content::ContentStore,
    error::{QuizError, QuizResult},
    ledger::UserLedger,
};

pub trait CategoryPolicy: Send + Sync {
    fn select_category(
        &self,
        store: &ContentStore,
        ledger: Option<&UserLedger>,
        rng: &mut dyn RngCore,
    ) -> QuizResult<String>;
}

/// Uniform over every category in the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformPolicy;

impl CategoryPolicy for UniformPolicy {
    fn select_category(
        &self,
        store: &ContentStore,
        _ledger: Option<&UserLedger>,
        rng: &mut dyn RngCore,
    ) -> QuizResult<String> {
        uniform_category(store, rng)
    }
}

/// Remediation heuristic: drill a weak category when the user has one.
///
/// Users with fewer than `min_history` attempts, or with no weak category,
/// get a uniform draw. There is no decay or recency weighting; a category
/// stays weak until its lifetime accuracy climbs back over `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct WeakestCategoryPolicy {
    pub min_history: u32,
    pub min_attempts: u32,
    pub threshold: f64,
}

impl Default for WeakestCategoryPolicy {
    fn default() -> Self {
        Self::from_config(&QuizConfig::default())
    }
}

impl WeakestCategoryPolicy {
    pub fn from_config(config: &QuizConfig) -> Self {
        Self {
            min_history: config.adaptive_min_history,
            min_attempts: config.weak_min_attempts,
            threshold: config.weak_threshold,
        }
    }
}

impl CategoryPolicy for WeakestCategoryPolicy {
    fn select_category(
        &self,
        store: &ContentStore,
        ledger: Option<&UserLedger>,
        rng: &mut dyn RngCore,
    ) -> QuizResult<String> {
        let ledger = match ledger {
            Some(l) if l.total_attempts() >= self.min_history => l,
            _ => return uniform_category(store, rng),
        };

        let weak: Vec<String> = ledger
            .weak_categories(self.min_attempts, self.threshold)
            .into_iter()
            .filter(|c| store.has_category(c))
            .collect();

        match weak.choose(rng) {
            Some(category) => {
                tracing::debug!(user = %ledger.user_id, category = %category, "targeting weak category");
                Ok(category.clone())
            }
            None => uniform_category(store, rng),
        }
    }
}

fn uniform_category(store: &ContentStore, rng: &mut dyn RngCore) -> QuizResult<String> {
    store
        .categories()
        .choose(rng)
        .map(|c| c.to_string())
        .ok_or(QuizError::EmptyContentStore)
}
