//! Per-user accuracy bookkeeping.
//!
//! Every user gets a [`UserLedger`] on first observation, pre-seeded with a zero
//! [`Tally`] for each category known to the content store. Counters only move
//! through [`PerformanceLedger::record_attempt`] and [`PerformanceLedger::reset`].
//!
//! [`SharedLedger`] wraps the ledger in a mutex so several sessions (or two tabs
//! of the same user) can submit without losing increments.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz_engine::{
    content::ContentStore,
    error::{QuizError, QuizResult},
    models::UserId,
};

/// Correct / total counter. `correct <= total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub correct: u32,
    pub total: u32,
}

impl Tally {
    fn record(&mut self, was_correct: bool) {
        // Saturate together so `correct <= total` survives hitting the ceiling.
        if self.total == u32::MAX {
            return;
        }
        self.total += 1;
        if was_correct {
            self.correct += 1;
        }
    }

    /// `correct / total`, or 0.0 when nothing has been attempted.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total)
    }

    fn merge(&mut self, other: Tally) {
        self.correct = self.correct.saturating_add(other.correct);
        self.total = self.total.saturating_add(other.total);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLedger {
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    categories: BTreeMap<String, Tally>,
    diagnoses: BTreeMap<String, Tally>,
}

impl UserLedger {
    fn new(user_id: UserId, categories: &BTreeSet<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            created_at: now,
            last_activity: now,
            categories: categories.iter().map(|c| (c.clone(), Tally::default())).collect(),
            diagnoses: BTreeMap::new(),
        }
    }

    pub fn tally(&self, category: &str) -> Tally {
        self.categories.get(category).copied().unwrap_or_default()
    }

    pub fn diagnosis_tally(&self, diagnosis: &str) -> Tally {
        self.diagnoses.get(diagnosis).copied().unwrap_or_default()
    }

    /// Tally summed over every category.
    pub fn overall(&self) -> Tally {
        let mut sum = Tally::default();
        for tally in self.categories.values() {
            sum.merge(*tally);
        }
        sum
    }

    pub fn total_attempts(&self) -> u32 {
        self.overall().total
    }

    /// Accuracy for one category, or across all of them when `category` is `None`.
    pub fn accuracy(&self, category: Option<&str>) -> f64 {
        match category {
            Some(cat) => self.tally(cat).accuracy(),
            None => self.overall().accuracy(),
        }
    }

    /// Categories with at least `min_attempts` attempts and accuracy below `threshold`.
    pub fn weak_categories(&self, min_attempts: u32, threshold: f64) -> BTreeSet<String> {
        self.categories
            .iter()
            .filter(|(_, t)| t.total >= min_attempts && t.accuracy() < threshold)
            .map(|(cat, _)| cat.clone())
            .collect()
    }

    pub fn category_tallies(&self) -> impl Iterator<Item = (&str, Tally)> {
        self.categories.iter().map(|(c, t)| (c.as_str(), *t))
    }

    fn reset(&mut self) {
        for tally in self.categories.values_mut() {
            *tally = Tally::default();
        }
        self.diagnoses.clear();
        self.last_activity = Utc::now();
    }
}

/// One row of the progress dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub correct: u32,
    pub total: u32,
    pub accuracy: f64,
    pub is_weak: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceLedger {
    categories: BTreeSet<String>,
    diagnoses: HashMap<String, String>,
    users: HashMap<UserId, UserLedger>,
}

impl PerformanceLedger {
    /// Ledger that accepts the categories and diagnoses present in `store`.
    pub fn new(store: &ContentStore) -> Self {
        Self {
            categories: store.category_set(),
            diagnoses: store.diagnosis_categories(),
            users: HashMap::new(),
        }
    }

    pub fn user(&self, user_id: &UserId) -> Option<&UserLedger> {
        self.users.get(user_id)
    }

    pub fn record_attempt(
        &mut self,
        user_id: &UserId,
        category: &str,
        diagnosis: &str,
        was_correct: bool,
    ) -> QuizResult<()> {
        if !self.categories.contains(category) {
            tracing::warn!(user = %user_id, category, "rejected attempt for unknown category");
            return Err(QuizError::InvalidCategory(category.to_string()));
        }
        match self.diagnoses.get(diagnosis) {
            None => return Err(QuizError::DiagnosisNotFound(diagnosis.to_string())),
            Some(owner) if owner != category => {
                tracing::warn!(user = %user_id, category, diagnosis, "rejected attempt filed under the wrong category");
                return Err(QuizError::CategoryMismatch {
                    diagnosis: diagnosis.to_string(),
                    category: category.to_string(),
                });
            }
            Some(_) => {}
        }

        let categories = &self.categories;
        let ledger = self.users.entry(user_id.clone()).or_insert_with(|| {
            tracing::info!(user = %user_id, "created performance ledger");
            UserLedger::new(user_id.clone(), categories)
        });

        ledger.categories.entry(category.to_string()).or_default().record(was_correct);
        ledger.diagnoses.entry(diagnosis.to_string()).or_default().record(was_correct);
        ledger.last_activity = Utc::now();

        tracing::debug!(user = %user_id, category, diagnosis, was_correct, "recorded attempt");
        Ok(())
    }

    /// 0.0 for a user with no ledger yet.
    pub fn accuracy(&self, user_id: &UserId, category: Option<&str>) -> f64 {
        self.user(user_id).map(|l| l.accuracy(category)).unwrap_or(0.0)
    }

    pub fn total_attempts(&self, user_id: &UserId) -> u32 {
        self.user(user_id).map(UserLedger::total_attempts).unwrap_or(0)
    }

    pub fn weak_categories(
        &self,
        user_id: &UserId,
        min_attempts: u32,
        threshold: f64,
    ) -> BTreeSet<String> {
        self.user(user_id)
            .map(|l| l.weak_categories(min_attempts, threshold))
            .unwrap_or_default()
    }

    /// Zero every counter for `user_id`. Identity and `created_at` survive.
    pub fn reset(&mut self, user_id: &UserId) {
        match self.users.get_mut(user_id) {
            Some(ledger) => {
                ledger.reset();
                tracing::info!(user = %user_id, "reset performance ledger");
            }
            None => tracing::debug!(user = %user_id, "reset requested for unknown user"),
        }
    }

    /// One row per known category, in category order.
    pub fn report(&self, user_id: &UserId, min_attempts: u32, threshold: f64) -> Vec<CategoryReport> {
        let ledger = self.user(user_id);
        self.categories
            .iter()
            .map(|category| {
                let tally = ledger.map(|l| l.tally(category)).unwrap_or_default();
                CategoryReport {
                    category: category.clone(),
                    correct: tally.correct,
                    total: tally.total,
                    accuracy: tally.accuracy(),
                    is_weak: tally.total >= min_attempts && tally.accuracy() < threshold,
                }
            })
            .collect()
    }
}

/// Thread-safe handle over a [`PerformanceLedger`].
///
/// Each method holds the lock for the whole read-modify-write.
#[derive(Debug, Clone)]
pub struct SharedLedger(Arc<Mutex<PerformanceLedger>>);

impl SharedLedger {
    pub fn new(ledger: PerformanceLedger) -> Self {
        Self(Arc::new(Mutex::new(ledger)))
    }

    pub fn for_store(store: &ContentStore) -> Self {
        Self::new(PerformanceLedger::new(store))
    }

    // A panic mid-update cannot leave a tally half-written, so a poisoned
    // lock still guards consistent data.
    fn lock(&self) -> MutexGuard<'_, PerformanceLedger> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_attempt(
        &self,
        user_id: &UserId,
        category: &str,
        diagnosis: &str,
        was_correct: bool,
    ) -> QuizResult<()> {
        self.lock().record_attempt(user_id, category, diagnosis, was_correct)
    }

    pub fn accuracy(&self, user_id: &UserId, category: Option<&str>) -> f64 {
        self.lock().accuracy(user_id, category)
    }

    pub fn total_attempts(&self, user_id: &UserId) -> u32 {
        self.lock().total_attempts(user_id)
    }

    pub fn weak_categories(
        &self,
        user_id: &UserId,
        min_attempts: u32,
        threshold: f64,
    ) -> BTreeSet<String> {
        self.lock().weak_categories(user_id, min_attempts, threshold)
    }

    pub fn reset(&self, user_id: &UserId) {
        self.lock().reset(user_id)
    }

    /// Copy of the user's ledger, so callers can read it without holding the lock.
    pub fn snapshot(&self, user_id: &UserId) -> Option<UserLedger> {
        self.lock().user(user_id).cloned()
    }

    pub fn report(&self, user_id: &UserId, min_attempts: u32, threshold: f64) -> Vec<CategoryReport> {
        self.lock().report(user_id, min_attempts, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz_engine::models::{DiagnosisRecord, Urgency};

    fn record(name: &str, category: &str) -> DiagnosisRecord {
        DiagnosisRecord {
            name: name.into(),
            symptoms: vec!["blurry vision".into()],
            key_finding: "finding".into(),
            urgency: "URGENT - soon".parse::<Urgency>().unwrap(),
            category: category.into(),
            teaching: vec!["point".into()],
        }
    }

    fn store() -> ContentStore {
        ContentStore::new(vec![
            record("CRAO", "Retina"),
            record("CRVO", "Retina"),
            record("BRVO", "Retina"),
            record("Open Angle Glaucoma", "Glaucoma"),
            record("Angle Closure Glaucoma", "Glaucoma"),
        ])
        .unwrap()
    }

    fn user(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    #[test]
    fn one_right_one_wrong_is_half() {
        let mut ledger = PerformanceLedger::new(&store());
        let u1 = user("u1");
        ledger.record_attempt(&u1, "Retina", "CRAO", true).unwrap();
        ledger.record_attempt(&u1, "Retina", "CRAO", false).unwrap();
        assert_eq!(ledger.accuracy(&u1, Some("Retina")), 0.5);
        assert_eq!(ledger.user(&u1).unwrap().diagnosis_tally("CRAO").total, 2);
    }

    #[test]
    fn counters_are_monotonic() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        let outcomes = [true, false, false, true, true, false, true];
        for (i, &ok) in outcomes.iter().enumerate() {
            ledger.record_attempt(&u, "Glaucoma", "Open Angle Glaucoma", ok).unwrap();
            let tally = ledger.user(&u).unwrap().tally("Glaucoma");
            assert_eq!(tally.total as usize, i + 1);
            assert_eq!(tally.correct as usize, outcomes[..=i].iter().filter(|&&c| c).count());
            assert!(tally.correct <= tally.total);
        }
    }

    #[test]
    fn accuracy_is_zero_without_attempts() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        assert_eq!(ledger.accuracy(&u, None), 0.0);
        ledger.record_attempt(&u, "Retina", "CRAO", true).unwrap();
        assert_eq!(ledger.accuracy(&u, Some("Glaucoma")), 0.0);
        assert_eq!(ledger.accuracy(&u, None), 1.0);
    }

    #[test]
    fn new_ledger_has_every_category_at_zero() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        ledger.record_attempt(&u, "Retina", "CRAO", true).unwrap();
        let cats: Vec<_> = ledger.user(&u).unwrap().category_tallies().map(|(c, _)| c).collect();
        assert_eq!(cats, vec!["Glaucoma", "Retina"]);
    }

    #[test]
    fn weak_categories_respect_min_attempts() {
        let mut ledger = PerformanceLedger::new(&store());
        let u2 = user("u2");
        for ok in [true, false, false, false, false] {
            ledger.record_attempt(&u2, "Retina", "CRVO", ok).unwrap();
        }
        let weak = ledger.weak_categories(&u2, 3, 0.6);
        assert_eq!(weak, BTreeSet::from(["Retina".to_string()]));

        // Two misses in Glaucoma are still below the attempt floor.
        ledger.record_attempt(&u2, "Glaucoma", "Open Angle Glaucoma", false).unwrap();
        ledger.record_attempt(&u2, "Glaucoma", "Open Angle Glaucoma", false).unwrap();
        assert!(!ledger.weak_categories(&u2, 3, 0.6).contains("Glaucoma"));
    }

    #[test]
    fn unknown_category_is_rejected_without_creating_a_bucket() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        let err = ledger.record_attempt(&u, "Dermatology", "Acne", true).unwrap_err();
        assert!(matches!(err, QuizError::InvalidCategory(c) if c == "Dermatology"));
        assert!(ledger.user(&u).is_none());
    }

    #[test]
    fn unknown_diagnosis_is_not_found() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        let err = ledger.record_attempt(&u, "Retina", "any", true).unwrap_err();
        assert!(matches!(err, QuizError::DiagnosisNotFound(d) if d == "any"));
        assert!(ledger.user(&u).is_none());
    }

    #[test]
    fn diagnosis_under_wrong_category_is_rejected() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        let err = ledger.record_attempt(&u, "Glaucoma", "CRAO", true).unwrap_err();
        assert!(matches!(err, QuizError::CategoryMismatch { .. }));
        assert_eq!(ledger.total_attempts(&u), 0);
    }

    #[test]
    fn tally_saturates_without_breaking_invariant() {
        let mut tally = Tally { correct: u32::MAX - 1, total: u32::MAX };
        tally.record(true);
        assert_eq!(tally, Tally { correct: u32::MAX - 1, total: u32::MAX });

        let mut sum = Tally { correct: u32::MAX, total: u32::MAX };
        sum.merge(Tally { correct: 1, total: 1 });
        assert_eq!(sum.total, u32::MAX);
        assert!(sum.correct <= sum.total);
    }

    #[test]
    fn reset_zeroes_counters_and_keeps_creation_time() {
        let mut ledger = PerformanceLedger::new(&store());
        let u1 = user("u1");
        ledger.record_attempt(&u1, "Retina", "CRAO", true).unwrap();
        let created = ledger.user(&u1).unwrap().created_at;

        ledger.reset(&u1);
        assert_eq!(ledger.accuracy(&u1, Some("Retina")), 0.0);
        assert_eq!(ledger.total_attempts(&u1), 0);
        assert_eq!(ledger.user(&u1).unwrap().created_at, created);

        ledger.record_attempt(&u1, "Retina", "CRAO", false).unwrap();
        assert_eq!(ledger.user(&u1).unwrap().tally("Retina"), Tally { correct: 0, total: 1 });
    }

    #[test]
    fn reset_of_unknown_user_is_a_no_op() {
        let mut ledger = PerformanceLedger::new(&store());
        ledger.reset(&user("ghost"));
        assert!(ledger.user(&user("ghost")).is_none());
    }

    #[test]
    fn users_are_isolated() {
        let mut ledger = PerformanceLedger::new(&store());
        ledger.record_attempt(&user("a"), "Retina", "CRAO", true).unwrap();
        assert_eq!(ledger.total_attempts(&user("b")), 0);
        assert_eq!(ledger.total_attempts(&user("A ")), 1);
    }

    #[test]
    fn report_flags_weak_rows() {
        let mut ledger = PerformanceLedger::new(&store());
        let u = user("u");
        for _ in 0..3 {
            ledger.record_attempt(&u, "Glaucoma", "Angle Closure Glaucoma", false).unwrap();
        }
        let report = ledger.report(&u, 3, 0.6);
        assert_eq!(report.len(), 2);
        let glaucoma = report.iter().find(|r| r.category == "Glaucoma").unwrap();
        assert!(glaucoma.is_weak);
        assert_eq!(glaucoma.total, 3);
        let retina = report.iter().find(|r| r.category == "Retina").unwrap();
        assert!(!retina.is_weak);
    }

    #[test]
    fn shared_ledger_does_not_lose_concurrent_updates() {
        let shared = SharedLedger::for_store(&store());
        let u = user("tabs");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let shared = shared.clone();
                let u = u.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        shared.record_attempt(&u, "Retina", "CRAO", i % 2 == 0).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let tally = shared.snapshot(&u).unwrap().tally("Retina");
        assert_eq!(tally.total, 400);
        assert_eq!(tally.correct, 200);
    }
}
