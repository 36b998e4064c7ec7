//! Read-only diagnosis knowledge base.
//!
//! Records are kept in name order and categories in label order so that a
//! seeded RNG walks the same candidates on every run.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::quiz_engine::{
    error::{QuizError, QuizResult},
    models::DiagnosisRecord,
};

const BUNDLED_DIAGNOSES: &str = include_str!("../../data/diagnoses.json");

#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    records: BTreeMap<String, DiagnosisRecord>,
    categories: BTreeMap<String, Vec<String>>,
}

impl ContentStore {
    /// Build a store from records, rejecting duplicates and incomplete entries.
    pub fn new(records: Vec<DiagnosisRecord>) -> QuizResult<Self> {
        let mut store = ContentStore::default();
        for record in records {
            validate_record(&record)?;
            if store.records.contains_key(&record.name) {
                return Err(QuizError::InvalidContent(format!(
                    "duplicate diagnosis: {}",
                    record.name
                )));
            }
            store
                .categories
                .entry(record.category.clone())
                .or_default()
                .push(record.name.clone());
            store.records.insert(record.name.clone(), record);
        }
        if let Some(name) = store.records.keys().find(|n| store.categories.contains_key(*n)) {
            return Err(QuizError::InvalidContent(format!(
                "diagnosis '{name}' shares its name with a category"
            )));
        }
        for names in store.categories.values_mut() {
            names.sort();
        }
        tracing::debug!(
            diagnoses = store.records.len(),
            categories = store.categories.len(),
            "content store loaded"
        );
        Ok(store)
    }

    /// Parse a JSON array of diagnosis records.
    pub fn from_json(json: &str) -> QuizResult<Self> {
        let records: Vec<DiagnosisRecord> =
            serde_json::from_str(json).map_err(QuizError::ContentLoad)?;
        Self::new(records)
    }

    /// The ophthalmology dataset shipped with the crate.
    pub fn bundled() -> QuizResult<Self> {
        Self::from_json(BUNDLED_DIAGNOSES)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every diagnosis name, in name order.
    pub fn all_diagnoses(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    /// Diagnosis names in `category`; empty for an unknown category.
    pub fn by_category(&self, category: &str) -> Vec<&str> {
        self.categories
            .get(category)
            .map(|names| names.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn record(&self, name: &str) -> QuizResult<&DiagnosisRecord> {
        self.records
            .get(name)
            .ok_or_else(|| QuizError::DiagnosisNotFound(name.to_string()))
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.keys().map(String::as_str).collect()
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Diagnoses per category, for the specialty overview.
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        self.categories
            .iter()
            .map(|(cat, names)| (cat.as_str(), names.len()))
            .collect()
    }

    pub(crate) fn category_set(&self) -> BTreeSet<String> {
        self.categories.keys().cloned().collect()
    }

    /// Diagnosis name to category label.
    pub(crate) fn diagnosis_categories(&self) -> HashMap<String, String> {
        self.records
            .values()
            .map(|r| (r.name.clone(), r.category.clone()))
            .collect()
    }
}

fn validate_record(record: &DiagnosisRecord) -> QuizResult<()> {
    let missing = if record.name.trim().is_empty() {
        Some("name")
    } else if record.category.trim().is_empty() {
        Some("category")
    } else if record.key_finding.trim().is_empty() {
        Some("key_finding")
    } else if record.symptoms.is_empty() {
        Some("symptoms")
    } else if record.teaching.is_empty() {
        Some("teaching")
    } else {
        None
    };
    match missing {
        Some(field) => Err(QuizError::InvalidContent(format!(
            "diagnosis '{}' has no {}",
            record.name, field
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_store_loads_all_diagnoses() {
        let store = ContentStore::bundled().unwrap();
        assert_eq!(store.len(), 45);
        assert_eq!(store.categories().len(), 6);
        assert_eq!(store.category_counts()["Retina"], 15);
    }

    #[test]
    fn by_category_filters_on_category() {
        let store = ContentStore::bundled().unwrap();
        let glaucoma = store.by_category("Glaucoma");
        assert_eq!(glaucoma.len(), 8);
        for name in glaucoma {
            assert_eq!(store.record(name).unwrap().category, "Glaucoma");
        }
    }

    #[test]
    fn unknown_category_is_empty_not_an_error() {
        let store = ContentStore::bundled().unwrap();
        assert!(store.by_category("Dermatology").is_empty());
        assert!(!store.has_category("Dermatology"));
    }

    #[test]
    fn unknown_diagnosis_is_not_found() {
        let store = ContentStore::bundled().unwrap();
        let err = store.record("Broken Heart").unwrap_err();
        assert!(matches!(err, QuizError::DiagnosisNotFound(name) if name == "Broken Heart"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let json = r#"[
            { "name": "A", "symptoms": ["x"], "key_finding": "f", "urgency": "ROUTINE",
              "category": "Retina", "teaching": ["t"] },
            { "name": "A", "symptoms": ["y"], "key_finding": "g", "urgency": "URGENT",
              "category": "Retina", "teaching": ["u"] }
        ]"#;
        assert!(matches!(
            ContentStore::from_json(json),
            Err(QuizError::InvalidContent(_))
        ));
    }

    #[test]
    fn record_without_symptoms_is_rejected() {
        let json = r#"[
            { "name": "A", "symptoms": [], "key_finding": "f", "urgency": "ROUTINE",
              "category": "Retina", "teaching": ["t"] }
        ]"#;
        assert!(matches!(
            ContentStore::from_json(json),
            Err(QuizError::InvalidContent(_))
        ));
    }

    #[test]
    fn diagnosis_named_like_a_category_is_rejected() {
        let json = r#"[
            { "name": "Cataract", "symptoms": ["glare"], "key_finding": "lens opacity",
              "urgency": "ELECTIVE", "category": "Cataract", "teaching": ["t"] },
            { "name": "Other", "symptoms": ["x"], "key_finding": "f", "urgency": "ROUTINE",
              "category": "Retina", "teaching": ["t"] }
        ]"#;
        let err = ContentStore::from_json(json).unwrap_err();
        assert!(matches!(err, QuizError::InvalidContent(msg) if msg.contains("Cataract")));
    }

    #[test]
    fn collision_with_a_later_category_is_rejected() {
        let json = r#"[
            { "name": "Retina", "symptoms": ["x"], "key_finding": "f", "urgency": "ROUTINE",
              "category": "Cornea", "teaching": ["t"] },
            { "name": "CRAO", "symptoms": ["y"], "key_finding": "g", "urgency": "EMERGENT",
              "category": "Retina", "teaching": ["t"] }
        ]"#;
        assert!(matches!(
            ContentStore::from_json(json),
            Err(QuizError::InvalidContent(_))
        ));
    }

    #[test]
    fn blank_key_finding_is_rejected() {
        let json = r#"[
            { "name": "A", "symptoms": ["x"], "key_finding": "  ", "urgency": "ROUTINE",
              "category": "Retina", "teaching": ["t"] }
        ]"#;
        let err = ContentStore::from_json(json).unwrap_err();
        assert!(matches!(err, QuizError::InvalidContent(msg) if msg.contains("key_finding")));
    }

    #[test]
    fn bad_urgency_fails_to_load() {
        let json = r#"[
            { "name": "A", "symptoms": ["x"], "key_finding": "f", "urgency": "LATER",
              "category": "Retina", "teaching": ["t"] }
        ]"#;
        assert!(matches!(
            ContentStore::from_json(json),
            Err(QuizError::ContentLoad(_))
        ));
    }
}
