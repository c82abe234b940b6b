//! Declarative SQLite schema definitions.
//!
//! Tables are described as const data and applied idempotently with
//! `CREATE TABLE IF NOT EXISTS`, so any component can trigger schema
//! creation at any time without coordination.

use anyhow::Result;
use rusqlite::{params, Connection};

/// Unix-seconds timestamp default for `created_at`-style columns.
pub const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Allow unused_mut because the variable is only mutated when optional
            // field assignments are passed to the macro (e.g., `is_primary_key = true`)
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
                default_value: None,
                foreign_key: None,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Real,
}

pub struct ForeignKey {
    pub foreign_table: &'static str,
    pub foreign_column: &'static str,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub default_value: Option<&'static str>,
    pub foreign_key: Option<&'static ForeignKey>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub unique_constraints: &'static [&'static [&'static str]],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    /// Create the table and its indices if they do not exist yet.
    pub fn create_if_missing(&self, conn: &Connection) -> Result<()> {
        let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&format!(
                "{} {}",
                column.name,
                match column.sql_type {
                    SqlType::Text => "TEXT",
                    SqlType::Integer => "INTEGER",
                    SqlType::Real => "REAL",
                }
            ));
            if column.is_primary_key {
                sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                sql.push_str(" NOT NULL");
            }
            if let Some(default_value) = column.default_value {
                sql.push_str(&format!(" DEFAULT {}", default_value));
            }
            if let Some(foreign_key) = column.foreign_key {
                sql.push_str(&format!(
                    " REFERENCES {}({})",
                    foreign_key.foreign_table, foreign_key.foreign_column
                ));
            }
        }
        for unique_constraint in self.unique_constraints {
            sql.push_str(&format!(", UNIQUE ({})", unique_constraint.join(", ")));
        }
        sql.push_str(");");
        conn.execute(&sql, params![])?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }
}

/// Apply a full schema: enables referential integrity and creates every
/// table that is missing. Safe to call repeatedly.
pub fn apply_schema(conn: &Connection, tables: &[Table]) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    for table in tables {
        table.create_if_missing(conn)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARENT_TABLE: Table = Table {
        name: "parent",
        columns: &[
            sqlite_column!("id", &SqlType::Text, is_primary_key = true),
            sqlite_column!("label", &SqlType::Text, non_null = true),
            sqlite_column!(
                "created_at",
                &SqlType::Integer,
                default_value = Some(DEFAULT_TIMESTAMP)
            ),
        ],
        unique_constraints: &[],
        indices: &[("idx_parent_label", "label")],
    };

    const PARENT_FK: ForeignKey = ForeignKey {
        foreign_table: "parent",
        foreign_column: "id",
    };

    const CHILD_TABLE: Table = Table {
        name: "child",
        columns: &[
            sqlite_column!(
                "parent_id",
                &SqlType::Text,
                non_null = true,
                foreign_key = Some(&PARENT_FK)
            ),
            sqlite_column!("owner", &SqlType::Text, non_null = true),
            sqlite_column!("score", &SqlType::Integer, non_null = true),
        ],
        unique_constraints: &[&["parent_id", "owner"]],
        indices: &[],
    };

    #[test]
    fn apply_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn, &[PARENT_TABLE, CHILD_TABLE]).unwrap();
        apply_schema(&conn, &[PARENT_TABLE, CHILD_TABLE]).unwrap();

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 2);

        let index_exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name='idx_parent_label'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_exists, 1);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn, &[PARENT_TABLE, CHILD_TABLE]).unwrap();

        let orphan = conn.execute(
            "INSERT INTO child (parent_id, owner, score) VALUES ('missing', 'alice', 5)",
            [],
        );
        assert!(orphan.is_err());
    }

    #[test]
    fn unique_constraint_rejects_duplicate_pair() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn, &[PARENT_TABLE, CHILD_TABLE]).unwrap();

        conn.execute("INSERT INTO parent (id, label) VALUES ('p1', 'x')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO child (parent_id, owner, score) VALUES ('p1', 'alice', 5)",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO child (parent_id, owner, score) VALUES ('p1', 'alice', 7)",
            [],
        );
        assert!(duplicate.is_err());
    }

    #[test]
    fn created_at_default_is_populated() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn, &[PARENT_TABLE, CHILD_TABLE]).unwrap();

        conn.execute("INSERT INTO parent (id, label) VALUES ('p1', 'x')", [])
            .unwrap();
        let created_at: i64 = conn
            .query_row("SELECT created_at FROM parent WHERE id = 'p1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert!(created_at > 1_500_000_000);
    }
}
