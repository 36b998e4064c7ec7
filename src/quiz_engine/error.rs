#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("unknown diagnosis: {0}")]
    DiagnosisNotFound(String),
    #[error("unknown category: {0}")]
    CategoryNotFound(String),
    #[error("content store has no diagnoses")]
    EmptyContentStore,
    #[error("not enough distractors to build a question for {diagnosis}")]
    InsufficientDistractors { diagnosis: String },
    #[error("category is not part of the content store: {0}")]
    InvalidCategory(String),
    #[error("diagnosis {diagnosis} does not belong to category {category}")]
    CategoryMismatch { diagnosis: String, category: String },
    #[error("user identifier cannot be empty")]
    InvalidUserId,
    #[error("invalid urgency: {0}")]
    InvalidUrgency(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid content: {0}")]
    InvalidContent(String),
    #[error("failed to parse content: {0}")]
    ContentLoad(serde_json::Error),
    #[error("failed to parse configuration: {0}")]
    ConfigLoad(serde_json::Error),
    #[error("no question is awaiting an answer")]
    NoActiveQuestion,
    #[error("no user is logged in")]
    NoActiveUser,
    #[error("option is not part of the current question: {0}")]
    UnknownOption(String),
}

pub type QuizResult<T> = std::result::Result<T, QuizError>;
