use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::quiz_engine::error::{QuizError, QuizResult};

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// Ordinal triage class. Declared most-urgent first so `Ord` follows
/// EMERGENT < URGENT < ROUTINE < ELECTIVE in sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    Emergent,
    Urgent,
    Routine,
    Elective,
}

impl UrgencyLevel {
    /// All four labels in triage order. Shape (c) questions offer exactly these.
    pub const ALL: [UrgencyLevel; 4] = [
        UrgencyLevel::Emergent,
        UrgencyLevel::Urgent,
        UrgencyLevel::Routine,
        UrgencyLevel::Elective,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UrgencyLevel::Emergent => "EMERGENT",
            UrgencyLevel::Urgent   => "URGENT",
            UrgencyLevel::Routine  => "ROUTINE",
            UrgencyLevel::Elective => "ELECTIVE",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for UrgencyLevel {
    type Err = QuizError;

    fn from_str(s: &str) -> QuizResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EMERGENT" => Ok(UrgencyLevel::Emergent),
            "URGENT"   => Ok(UrgencyLevel::Urgent),
            "ROUTINE"  => Ok(UrgencyLevel::Routine),
            "ELECTIVE" => Ok(UrgencyLevel::Elective),
            _ => Err(QuizError::InvalidUrgency(s.to_string())),
        }
    }
}

/// An urgency class plus its free-text qualifier, e.g. `EMERGENT - 4-6 hour window`.
///
/// Serialized as the single `"LEVEL - qualifier"` string used by the content files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urgency {
    pub level: UrgencyLevel,
    pub qualifier: String,
}

impl FromStr for Urgency {
    type Err = QuizError;

    fn from_str(s: &str) -> QuizResult<Self> {
        let (level, qualifier) = match s.split_once(" - ") {
            Some((level, qualifier)) => (level, qualifier.trim()),
            None => (s, ""),
        };
        Ok(Urgency {
            level: level.parse().map_err(|_| QuizError::InvalidUrgency(s.to_string()))?,
            qualifier: qualifier.to_string(),
        })
    }
}

impl TryFrom<String> for Urgency {
    type Error = QuizError;

    fn try_from(value: String) -> QuizResult<Self> {
        value.parse()
    }
}

impl From<Urgency> for String {
    fn from(u: Urgency) -> String {
        u.to_string()
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifier.is_empty() {
            write!(f, "{}", self.level)
        } else {
            write!(f, "{} - {}", self.level, self.qualifier)
        }
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// One entry of the knowledge base. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub name: String,
    pub symptoms: Vec<String>,
    pub key_finding: String,
    pub urgency: Urgency,
    pub category: String,
    pub teaching: Vec<String>,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Normalized resident identifier.
///
/// Login is free text, so identity is case-insensitive with surrounding and
/// repeated inner whitespace ignored: `"  Dr  Smith "` and `"dr smith"` are the
/// same ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: &str) -> QuizResult<Self> {
        let normalized = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        if normalized.is_empty() {
            return Err(QuizError::InvalidUserId);
        }
        Ok(UserId(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = QuizError;

    fn try_from(value: String) -> QuizResult<Self> {
        UserId::new(&value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> String {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Question request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionShape {
    /// Symptoms shown, diagnosis asked.
    SymptomsToDiagnosis,
    /// Key exam finding shown, diagnosis asked.
    FindingToDiagnosis,
    /// Symptoms shown, urgency class asked.
    SymptomsToUrgency,
}

impl QuestionShape {
    pub const ALL: [QuestionShape; 3] = [
        QuestionShape::SymptomsToDiagnosis,
        QuestionShape::FindingToDiagnosis,
        QuestionShape::SymptomsToUrgency,
    ];

    /// Prefix used in generated question IDs.
    pub fn id_prefix(self) -> &'static str {
        match self {
            QuestionShape::SymptomsToDiagnosis => "SD",
            QuestionShape::FindingToDiagnosis  => "FD",
            QuestionShape::SymptomsToUrgency   => "SU",
        }
    }
}

impl fmt::Display for QuestionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionShape::SymptomsToDiagnosis => "Symptoms to Diagnosis",
            QuestionShape::FindingToDiagnosis  => "Key Finding to Diagnosis",
            QuestionShape::SymptomsToUrgency   => "Symptoms to Urgency",
        };
        write!(f, "{}", s)
    }
}

/// How the session picks the category of its next question.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuizMode {
    /// Category chosen by the session's [`CategoryPolicy`](crate::quiz_engine::policy::CategoryPolicy).
    #[default]
    Adaptive,
    /// Uniform over all categories, ignoring the ledger.
    Random,
    /// Always the given category.
    Focused(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizRequest {
    pub mode: QuizMode,
    /// Force a question shape; `None` picks one uniformly.
    pub shape: Option<QuestionShape>,
    pub rng_seed: Option<u64>,
}

impl QuizRequest {
    /// Adaptive request with random shape and entropy seeding.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: QuizMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_shape(mut self, shape: QuestionShape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// A single generated multiple-choice question.
///
/// Consumed by exactly one submit; the session discards it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionInstance {
    pub question_id: String,
    pub shape: QuestionShape,
    /// Source diagnosis, used to route ledger updates.
    pub diagnosis: String,
    pub category: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
    pub teaching_points: Vec<String>,
}

impl QuestionInstance {
    pub fn is_correct(&self, option: &str) -> bool {
        option == self.correct_answer
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}
