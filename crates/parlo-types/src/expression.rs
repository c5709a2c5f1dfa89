//! Expression types.
//!
//! An expression is a short phrase a learner collects and practices.
//! Practice attempts bump its counters; `correct_count` can never exceed
//! `total_count` because the only mutation path increments them together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A phrase a learner is practicing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expression {
    /// Unique identifier.
    pub id: Uuid,
    /// The phrase itself.
    pub text: String,
    /// Owning category, if any. `None` means uncategorized.
    pub category_id: Option<Uuid>,
    /// Number of practice attempts graded correct.
    pub correct_count: u32,
    /// Total number of practice attempts.
    pub total_count: u32,
    /// When this expression was last practiced.
    pub last_used: Option<DateTime<Utc>>,
    /// When this expression was created.
    pub created_at: DateTime<Utc>,
}

impl Expression {
    /// Create a new expression with zeroed counters.
    pub fn new(text: String, category_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            category_id,
            correct_count: 0,
            total_count: 0,
            last_used: None,
            created_at: Utc::now(),
        }
    }

    /// Fraction of attempts graded correct, or `None` before the first attempt.
    pub fn accuracy(&self) -> Option<f64> {
        if self.total_count == 0 {
            None
        } else {
            Some(f64::from(self.correct_count) / f64::from(self.total_count))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_expression_has_zeroed_counters() {
        let expr = Expression::new("on the tip of my tongue".to_string(), None);
        assert_eq!(expr.correct_count, 0);
        assert_eq!(expr.total_count, 0);
        assert!(expr.last_used.is_none());
        assert!(expr.accuracy().is_none());
    }

    #[test]
    fn test_accuracy() {
        let mut expr = Expression::new("break a leg".to_string(), None);
        expr.correct_count = 3;
        expr.total_count = 4;
        assert_eq!(expr.accuracy(), Some(0.75));
    }

    #[test]
    fn test_serde_round_trip() {
        let expr = Expression::new("call it a day".to_string(), Some(Uuid::new_v4()));
        let json = serde_json::to_string(&expr).unwrap();
        let back: Expression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
