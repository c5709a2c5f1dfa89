//! Category types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A descriptive grouping for expressions.
///
/// Deleting a category reassigns its expressions to uncategorized; it
/// never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Icon identifier for the client.
    pub icon: String,
    /// Display color (CSS hex).
    pub color: String,
}

impl Category {
    pub fn new(name: String, icon: Option<String>, color: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            icon: icon.unwrap_or_else(|| "tag".to_string()),
            color: color.unwrap_or_else(|| "#6b7280".to_string()),
        }
    }
}
