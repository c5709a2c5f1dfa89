//! SQLite persistence for expressions and categories.

use crate::{ParloError, Result};
use chrono::Utc;
use parlo_types::{Category, Expression};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Raw aggregate counters for the stats endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub expressions: u64,
    pub categories: u64,
    pub total_attempts: u64,
    pub correct_attempts: u64,
}

/// SQLite-based expression store.
pub struct ExpressionStore {
    conn: Mutex<Connection>,
}

impl ExpressionStore {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        store.migrate()?;
        Ok(store)
    }

    /// Initialize database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS expressions (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                category_id TEXT,
                correct_count INTEGER NOT NULL DEFAULT 0,
                total_count INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                icon TEXT NOT NULL,
                color TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_expressions_category ON expressions(category_id);
            CREATE INDEX IF NOT EXISTS idx_expressions_created ON expressions(created_at);
            "#,
        )?;
        Ok(())
    }

    /// Run migrations for schema updates.
    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        // Check if last_used column exists
        let has_last_used: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM pragma_table_info('expressions') WHERE name = 'last_used'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !has_last_used {
            conn.execute_batch("ALTER TABLE expressions ADD COLUMN last_used TEXT;")?;
        }

        Ok(())
    }

    /// Insert a new expression.
    pub fn insert_expression(&self, expression: &Expression) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO expressions (
                id, text, category_id, correct_count, total_count, last_used, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                expression.id.to_string(),
                expression.text,
                expression.category_id.map(|id| id.to_string()),
                expression.correct_count,
                expression.total_count,
                expression.last_used.map(|t| t.to_rfc3339()),
                expression.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Get an expression by ID.
    pub fn get_expression(&self, id: Uuid) -> Result<Option<Expression>> {
        let conn = self.conn.lock().unwrap();
        Self::fetch_expression(&conn, id)
    }

    /// List expressions, newest first, optionally filtered by category.
    pub fn list_expressions(&self, category_id: Option<Uuid>) -> Result<Vec<Expression>> {
        let conn = self.conn.lock().unwrap();
        let expressions = match category_id {
            Some(category_id) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM expressions WHERE category_id = ?1 ORDER BY created_at DESC",
                )?;
                let rows = stmt.query_map(params![category_id.to_string()], |row| {
                    Self::row_to_expression(row)
                })?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM expressions ORDER BY created_at DESC")?;
                let rows = stmt.query_map([], |row| Self::row_to_expression(row))?;
                rows.collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(expressions)
    }

    /// Delete an expression.
    pub fn delete_expression(&self, id: Uuid) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM expressions WHERE id = ?1",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(ParloError::ExpressionNotFound(id));
        }
        Ok(())
    }

    /// Record one practice attempt and return the updated expression.
    ///
    /// `total_count` always increments; `correct_count` only on success,
    /// which is what keeps `correct_count <= total_count` an invariant.
    pub fn record_attempt(&self, id: Uuid, correct: bool) -> Result<Expression> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            r#"
            UPDATE expressions SET
                total_count = total_count + 1,
                correct_count = correct_count + ?1,
                last_used = ?2
            WHERE id = ?3
            "#,
            params![
                if correct { 1 } else { 0 },
                Utc::now().to_rfc3339(),
                id.to_string()
            ],
        )?;
        if updated == 0 {
            return Err(ParloError::ExpressionNotFound(id));
        }
        Self::fetch_expression(&conn, id)?.ok_or(ParloError::ExpressionNotFound(id))
    }

    /// Insert a new category.
    pub fn insert_category(&self, category: &Category) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO categories (id, name, icon, color) VALUES (?1, ?2, ?3, ?4)",
            params![
                category.id.to_string(),
                category.name,
                category.icon,
                category.color,
            ],
        )?;
        Ok(())
    }

    /// Get a category by ID.
    pub fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let conn = self.conn.lock().unwrap();
        let category = conn
            .query_row(
                "SELECT * FROM categories WHERE id = ?1",
                params![id.to_string()],
                |row| Self::row_to_category(row),
            )
            .optional()?;
        Ok(category)
    }

    /// List all categories, sorted by name.
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM categories ORDER BY name COLLATE NOCASE")?;
        let categories = stmt
            .query_map([], |row| Self::row_to_category(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    /// Delete a category, reassigning its expressions to uncategorized.
    ///
    /// Expressions are never deleted along with their category.
    pub fn delete_category(&self, id: Uuid) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE expressions SET category_id = NULL WHERE category_id = ?1",
            params![id.to_string()],
        )?;
        let deleted = conn.execute(
            "DELETE FROM categories WHERE id = ?1",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(ParloError::CategoryNotFound(id));
        }
        Ok(())
    }

    /// Aggregate counters across the whole store.
    pub fn counts(&self) -> Result<StoreCounts> {
        let conn = self.conn.lock().unwrap();
        let (expressions, total_attempts, correct_attempts): (i64, i64, i64) = conn.query_row(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total_count), 0), COALESCE(SUM(correct_count), 0)
            FROM expressions
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        let categories: i64 =
            conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;

        Ok(StoreCounts {
            expressions: expressions as u64,
            categories: categories as u64,
            total_attempts: total_attempts as u64,
            correct_attempts: correct_attempts as u64,
        })
    }

    fn fetch_expression(conn: &Connection, id: Uuid) -> Result<Option<Expression>> {
        let expression = conn
            .query_row(
                "SELECT * FROM expressions WHERE id = ?1",
                params![id.to_string()],
                |row| Self::row_to_expression(row),
            )
            .optional()?;
        Ok(expression)
    }

    fn row_to_expression(row: &Row) -> rusqlite::Result<Expression> {
        let id: String = row.get("id")?;
        let text: String = row.get("text")?;
        let category_id: Option<String> = row.get("category_id")?;
        let correct_count: i64 = row.get("correct_count")?;
        let total_count: i64 = row.get("total_count")?;
        let last_used: Option<String> = row.get("last_used").unwrap_or(None);
        let created_at: String = row.get("created_at")?;

        Ok(Expression {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            text,
            category_id: category_id.and_then(|c| Uuid::parse_str(&c).ok()),
            correct_count: correct_count as u32,
            total_count: total_count as u32,
            last_used: last_used.and_then(|t| {
                chrono::DateTime::parse_from_rfc3339(&t)
                    .map(|dt| dt.with_timezone(&chrono::Utc))
                    .ok()
            }),
            created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_default(),
        })
    }

    fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
        let id: String = row.get("id")?;
        let name: String = row.get("name")?;
        let icon: String = row.get("icon")?;
        let color: String = row.get("color")?;

        Ok(Category {
            id: Uuid::parse_str(&id).unwrap_or_default(),
            name,
            icon,
            color,
        })
    }
}
