//! Ask command implementation

use crate::answer::{Answer, QueryEngine};
use crate::config::Config;
use crate::error::Result;

/// Answer a single question from the persisted index
pub async fn cmd_ask(config: &Config, question: &str, k: usize) -> Result<Answer> {
    let engine = QueryEngine::open(config)?;
    engine.answer(question, k).await
}

/// Print an answer with its sources
pub fn print_answer(answer: &Answer) {
    println!("{}", answer.answer);

    if !answer.sources.is_empty() {
        println!();
        for (i, source) in answer.sources.iter().enumerate() {
            println!("[{}] {}", i + 1, source);
        }
    }
}
