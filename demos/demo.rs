//! End-to-end walk through a quiz session.
//!
//! Run with: `cargo run --example demo` (set `RUST_LOG=debug` to watch the
//! category selection).
//!
//! 1. **One question per shape**: fixed seeds, so the output is reproducible.
//! 2. **A struggling resident**: ten answers, always wrong in Glaucoma, then
//!    the adaptive session keeps steering back to Glaucoma.
//! 3. **Dashboard and reset**: per-category accuracy before and after a reset.

use std::sync::Arc;

use ophtho_drill_gen::{
    generate, ContentStore, QuestionInstance, QuestionShape, QuizConfig, QuizError, QuizMode,
    QuizRequest, QuizSession, SharedLedger,
};
use tracing_subscriber::EnvFilter;

fn print_question(q: &QuestionInstance) {
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  [{}]  {}  ID: {}", q.shape, q.category, q.question_id);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Q: {}", q.prompt);
    for option in &q.options {
        let marker = if q.is_correct(option) { "✓" } else { " " };
        println!("   [{marker}] {option}");
    }
    println!("  {}", q.explanation);
    for (i, point) in q.teaching_points.iter().enumerate() {
        println!("    {}. {point}", i + 1);
    }
    println!();
}

fn main() -> Result<(), QuizError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let store = Arc::new(ContentStore::bundled()?);
    println!("Loaded {} diagnoses:", store.len());
    for (category, count) in store.category_counts() {
        println!("  {category}: {count}");
    }
    println!();

    for (seed, shape) in QuestionShape::ALL.into_iter().enumerate() {
        let request = QuizRequest::new().with_shape(shape).with_seed(seed as u64);
        print_question(&generate(&store, None, &request)?);
    }

    let ledger = SharedLedger::for_store(&store);
    let mut session = QuizSession::new(store.clone(), ledger, QuizConfig::default()).with_seed(2024);
    session.login("  Dr. Patel ")?;

    session.set_mode(QuizMode::Random)?;
    for _ in 0..10 {
        let q = session.generate_question(None)?.clone();
        let answer = if q.category == "Glaucoma" {
            q.options.iter().find(|o| !q.is_correct(o)).cloned().unwrap_or_default()
        } else {
            q.correct_answer.clone()
        };
        session.submit_answer(&answer)?;
    }

    // Guarantee enough Glaucoma misses for the demo regardless of the draw.
    session.set_mode(QuizMode::Focused("Glaucoma".into()))?;
    for _ in 0..3 {
        let q = session.generate_question(None)?.clone();
        let wrong = q.options.iter().find(|o| !q.is_correct(o)).cloned().unwrap_or_default();
        session.submit_answer(&wrong)?;
    }

    session.set_mode(QuizMode::Adaptive)?;
    println!("Adaptive picks for {}:", session.user().map(|u| u.as_str()).unwrap_or("?"));
    for _ in 0..5 {
        let q = session.generate_question(None)?;
        println!("  {}: {}", q.category, q.diagnosis);
    }
    println!();

    let board = session.dashboard()?;
    println!("Overall: {:.1}% over {} answers", board.overall_accuracy * 100.0, board.total_attempts);
    for row in &board.categories {
        let flag = if row.is_weak { " (weak)" } else { "" };
        println!("  {:<22} {:>2}/{:<2} {:>5.1}%{flag}", row.category, row.correct, row.total, row.accuracy * 100.0);
    }

    session.reset_progress()?;
    println!("After reset: {} answers", session.dashboard()?.total_attempts);
    Ok(())
}
