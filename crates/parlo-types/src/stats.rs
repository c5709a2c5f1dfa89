//! Progress statistics and achievement badges.
//!
//! Badges are derived from the raw counters on read; they are never
//! stored, so thresholds can change without a data migration.

use serde::Serialize;

/// An achievement badge with its earned state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Achievement {
    /// Stable machine code, e.g. `"first_steps"`.
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub earned: bool,
}

/// Aggregate progress over all stored expressions.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsSummary {
    pub expression_count: u64,
    pub category_count: u64,
    pub total_attempts: u64,
    pub correct_attempts: u64,
    /// Overall accuracy in `[0, 1]`; 0 before the first attempt.
    pub accuracy: f64,
    pub achievements: Vec<Achievement>,
}

impl StatsSummary {
    /// Build a summary from raw store counters.
    pub fn from_counts(
        expression_count: u64,
        category_count: u64,
        total_attempts: u64,
        correct_attempts: u64,
    ) -> Self {
        let accuracy = if total_attempts == 0 {
            0.0
        } else {
            correct_attempts as f64 / total_attempts as f64
        };

        let achievements = vec![
            Achievement {
                code: "first_steps",
                title: "First Steps",
                description: "Save your first expression",
                earned: expression_count >= 1,
            },
            Achievement {
                code: "collector",
                title: "Collector",
                description: "Save 10 expressions",
                earned: expression_count >= 10,
            },
            Achievement {
                code: "organizer",
                title: "Organizer",
                description: "Create 3 categories",
                earned: category_count >= 3,
            },
            Achievement {
                code: "dedicated",
                title: "Dedicated",
                description: "Complete 25 practice rounds",
                earned: total_attempts >= 25,
            },
            Achievement {
                code: "sharp_ear",
                title: "Sharp Ear",
                description: "Reach 80% accuracy over at least 10 rounds",
                earned: total_attempts >= 10 && accuracy >= 0.8,
            },
        ];

        Self {
            expression_count,
            category_count,
            total_attempts,
            correct_attempts,
            accuracy,
            achievements,
        }
    }

    /// Whether the badge with the given code has been earned.
    pub fn earned(&self, code: &str) -> bool {
        self.achievements
            .iter()
            .any(|a| a.code == code && a.earned)
    }
}
