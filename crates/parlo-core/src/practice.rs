//! Practice-round generation and grading.
//!
//! All natural-language work is delegated to a [`TextGenerationClient`];
//! the reply is treated as an opaque string and parsed locally. Every
//! external failure collapses to a documented fallback at this boundary,
//! so the public methods only fail on invalid input.

use crate::llm::TextGenerationClient;
use crate::{ParloError, Result};
use futures::future::join_all;
use parlo_types::{
    DialogueTurn, Evaluation, Expression, PracticeDialogue, PracticeRound, PreparedRound, Speaker,
};
use std::sync::Arc;

/// Exact reply token signalling a correct answer.
///
/// Matched against the trimmed first line of the grader's reply by full
/// string equality. Substring matches do not count: an explanation that
/// merely contains the word grades as incorrect.
pub const CORRECT_SENTINEL: &str = "Correct!";

/// Fixed closing line appended after every lead-in dialogue.
pub const FINAL_PROMPT: &str = "Your turn! Try to say it yourself.";

const FALLBACK_FEEDBACK: &str = "I couldn't grade that answer right now. Give it another try!";

const QUERY_SYSTEM_PROMPT: &str = "You help language learners find phrases to practice. \
Turn the learner's input into one short, focused search query that captures the situation \
the phrase is used in. Reply with the query only, no quotes, no explanation.";

const DIALOGUE_SYSTEM_PROMPT: &str = "You write short practice dialogues for language \
learners. Write exactly three alternating lines between two speakers, prefixed \"A:\" and \
\"B:\", that build up to a moment where the learner would naturally say the target \
sentence. Never say the target sentence itself. Reply with the three lines only.";

const GRADER_SYSTEM_PROMPT: &str = "You grade a language learner's attempt at a target \
sentence. If the attempt conveys the same meaning with acceptable wording, reply with \
exactly \"Correct!\" and nothing else. Otherwise explain briefly, in simple language, \
what to fix.";

/// Temperatures for the two kinds of prompt.
#[derive(Debug, Clone)]
pub struct PracticeConfig {
    /// Used for query and dialogue generation. Favors variety.
    pub dialogue_temperature: f32,
    /// Used for grading. Favors determinism.
    pub grading_temperature: f32,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            dialogue_temperature: 0.7,
            grading_temperature: 0.3,
        }
    }
}

/// Generates practice rounds and grades attempts.
pub struct PracticeGenerator {
    client: Arc<dyn TextGenerationClient>,
    config: PracticeConfig,
}

impl PracticeGenerator {
    pub fn new(client: Arc<dyn TextGenerationClient>, config: PracticeConfig) -> Self {
        Self { client, config }
    }

    /// Turn the learner's input into a focused search query.
    ///
    /// On any external failure the input itself is returned unchanged.
    pub async fn search_query(&self, user_input: &str) -> Result<String> {
        require_text("user_input", user_input)?;

        let user_prompt = format!("Learner's input: {}", user_input);
        match self
            .client
            .complete(QUERY_SYSTEM_PROMPT, &user_prompt, self.config.dialogue_temperature)
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => Ok(reply.trim().to_string()),
            Ok(_) => {
                tracing::warn!(
                    target: "parlo::practice",
                    "Empty search query reply, falling back to raw input"
                );
                Ok(user_input.to_string())
            }
            Err(e) => {
                tracing::warn!(
                    target: "parlo::practice",
                    "Search query generation failed, falling back to raw input: {}", e
                );
                Ok(user_input.to_string())
            }
        }
    }

    /// Generate a lead-in dialogue of at most three alternating turns.
    ///
    /// On failure returns the two-line fallback dialogue; the final prompt
    /// line is the same either way.
    pub async fn practice_dialogue(&self, target_sentence: &str) -> Result<PracticeDialogue> {
        require_text("target_sentence", target_sentence)?;

        let user_prompt = format!("Target sentence: {}", target_sentence);
        let turns = match self
            .client
            .complete(DIALOGUE_SYSTEM_PROMPT, &user_prompt, self.config.dialogue_temperature)
            .await
        {
            Ok(reply) => {
                let turns = parse_dialogue(&reply);
                if turns.is_empty() {
                    tracing::warn!(
                        target: "parlo::practice",
                        "Dialogue reply had no usable lines, using fallback"
                    );
                    fallback_turns()
                } else {
                    turns
                }
            }
            Err(e) => {
                tracing::warn!(
                    target: "parlo::practice",
                    "Dialogue generation failed, using fallback: {}", e
                );
                fallback_turns()
            }
        };

        Ok(PracticeDialogue {
            turns,
            final_prompt: FINAL_PROMPT.to_string(),
        })
    }

    /// Generate a full practice round for a target sentence.
    ///
    /// The search query and the dialogue are independent external calls
    /// and run concurrently.
    pub async fn practice_round(&self, target_sentence: &str) -> Result<PracticeRound> {
        require_text("target_sentence", target_sentence)?;

        let (search_query, dialogue) = futures::join!(
            self.search_query(target_sentence),
            self.practice_dialogue(target_sentence)
        );

        Ok(PracticeRound {
            search_query: search_query?,
            target_sentence: target_sentence.to_string(),
            dialogue: dialogue?,
        })
    }

    /// Grade the learner's attempt against the target sentence.
    ///
    /// Correct iff the trimmed first line of the reply equals
    /// [`CORRECT_SENTINEL`] exactly. On failure returns an incorrect
    /// verdict with generic feedback.
    pub async fn evaluate(&self, user_response: &str, target_sentence: &str) -> Result<Evaluation> {
        require_text("user_response", user_response)?;
        require_text("target_sentence", target_sentence)?;

        let user_prompt = format!(
            "Target sentence: {}\nLearner's attempt: {}",
            target_sentence, user_response
        );
        match self
            .client
            .complete(GRADER_SYSTEM_PROMPT, &user_prompt, self.config.grading_temperature)
            .await
        {
            Ok(reply) if !reply.trim().is_empty() => {
                let reply = reply.trim();
                let first_line = reply.lines().next().unwrap_or("").trim();
                Ok(Evaluation {
                    is_correct: first_line == CORRECT_SENTINEL,
                    feedback: reply.to_string(),
                })
            }
            Ok(_) => {
                tracing::warn!(target: "parlo::practice", "Empty grading reply, using fallback");
                Ok(fallback_evaluation())
            }
            Err(e) => {
                tracing::warn!(
                    target: "parlo::practice",
                    "Grading failed, using fallback: {}", e
                );
                Ok(fallback_evaluation())
            }
        }
    }

    /// Pre-compute search queries for a batch of expressions concurrently.
    ///
    /// Completion order is undefined, so each result carries its
    /// expression id; callers must pair by id, never by position in time.
    pub async fn prepare_rounds(&self, expressions: &[Expression]) -> Vec<PreparedRound> {
        let tasks = expressions.iter().map(|expr| async move {
            let search_query = match self.search_query(&expr.text).await {
                Ok(query) => query,
                // Only reachable for blank stored text; keep it as-is.
                Err(_) => expr.text.clone(),
            };
            PreparedRound {
                expression_id: expr.id,
                search_query,
            }
        });
        join_all(tasks).await
    }
}

fn require_text(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ParloError::InvalidArgument(format!(
            "{} must not be empty",
            name
        )));
    }
    Ok(())
}

fn fallback_evaluation() -> Evaluation {
    Evaluation {
        is_correct: false,
        feedback: FALLBACK_FEEDBACK.to_string(),
    }
}

fn fallback_turns() -> Vec<DialogueTurn> {
    vec![
        DialogueTurn {
            speaker: Speaker::A,
            line: "Let's set the scene and practice.".to_string(),
        },
        DialogueTurn {
            speaker: Speaker::B,
            line: "Okay, I'm ready when you are.".to_string(),
        },
    ]
}

/// Parse a dialogue reply line by line, keeping at most three turns.
///
/// Lines with an explicit `A:`/`B:` prefix keep their speaker; unprefixed
/// lines alternate by parity, starting at A.
fn parse_dialogue(text: &str) -> Vec<DialogueTurn> {
    let mut turns = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (speaker, content) = if let Some(rest) = line.strip_prefix("A:") {
            (Speaker::A, rest.trim())
        } else if let Some(rest) = line.strip_prefix("B:") {
            (Speaker::B, rest.trim())
        } else if turns.len() % 2 == 0 {
            (Speaker::A, line)
        } else {
            (Speaker::B, line)
        };

        if content.is_empty() {
            continue;
        }
        turns.push(DialogueTurn {
            speaker,
            line: content.to_string(),
        });
        if turns.len() == 3 {
            break;
        }
    }
    turns
}
