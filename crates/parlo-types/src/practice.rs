//! Practice-round types.
//!
//! Everything here is transient: produced fresh per request, returned to
//! the client, never persisted beyond the chat message log.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A candidate expression paired with its similarity score, in `[0, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub text: String,
    pub score: f64,
}

/// Which side of the generated dialogue is speaking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    A,
    B,
}

/// One line of a generated lead-in dialogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub line: String,
}

/// A short lead-in dialogue building up to a target sentence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeDialogue {
    /// At most three alternating turns; never states the target sentence.
    pub turns: Vec<DialogueTurn>,
    /// Fixed closing line prompting the learner to answer.
    pub final_prompt: String,
}

/// One practice attempt's generated context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PracticeRound {
    pub search_query: String,
    pub target_sentence: String,
    pub dialogue: PracticeDialogue,
}

/// A search query pre-computed for a stored expression.
///
/// Batch preparation runs concurrently; the `expression_id` pairing is
/// what ties a query back to its expression, not completion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreparedRound {
    pub expression_id: Uuid,
    pub search_query: String,
}

/// Grading verdict for a learner's attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    pub is_correct: bool,
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Speaker::A).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&Speaker::B).unwrap(), "\"b\"");
    }

    #[test]
    fn test_practice_round_round_trip() {
        let round = PracticeRound {
            search_query: "ordering food politely".to_string(),
            target_sentence: "I would like to order".to_string(),
            dialogue: PracticeDialogue {
                turns: vec![
                    DialogueTurn {
                        speaker: Speaker::A,
                        line: "Welcome in! Table for one?".to_string(),
                    },
                    DialogueTurn {
                        speaker: Speaker::B,
                        line: "Yes, please.".to_string(),
                    },
                ],
                final_prompt: "Your turn! Try to say it yourself.".to_string(),
            },
        };
        let json = serde_json::to_string(&round).unwrap();
        let back: PracticeRound = serde_json::from_str(&json).unwrap();
        assert_eq!(back, round);
    }
}
