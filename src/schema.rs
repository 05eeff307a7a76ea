//! Column specs and constraint rendering for table creation.

use serde::{Deserialize, Serialize};

/// Column constraint, rendered into the column definition.
///
/// `Check` and `Default` carry their expression/literal, so a CHECK
/// without an expression cannot be constructed.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    #[default]
    None,
    NotNull,
    Unique,
    PrimaryKey,
    Check(String),
    Default(String),
    NotNullUnique,
    NotNullPrimaryKey,
    NotNullDefault(String),
}

impl Constraint {
    /// SQL fragment appended after the column type, leading space
    /// included; empty for `None`.
    pub fn render(&self) -> String {
        match self {
            Constraint::None => String::new(),
            Constraint::NotNull => " NOT NULL".to_string(),
            Constraint::Unique => " UNIQUE".to_string(),
            Constraint::PrimaryKey => " PRIMARY KEY".to_string(),
            Constraint::Check(expr) => format!(" CHECK ({expr})"),
            Constraint::Default(literal) => format!(" DEFAULT '{literal}'"),
            Constraint::NotNullUnique => " NOT NULL UNIQUE".to_string(),
            Constraint::NotNullPrimaryKey => " NOT NULL PRIMARY KEY".to_string(),
            Constraint::NotNullDefault(literal) => {
                format!(" NOT NULL DEFAULT '{literal}'")
            }
        }
    }
}

/// One column of a pending table definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub data_type: String,
    pub constraint: Constraint,
}

impl ColumnSpec {
    pub fn new(
        name: impl Into<String>,
        data_type: impl Into<String>,
        constraint: Constraint,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            constraint,
        }
    }

    /// Full column definition, e.g. `NAME TEXT NOT NULL`.
    pub fn definition(&self) -> String {
        format!("{} {}{}", self.name, self.data_type, self.constraint.render())
    }
}

/// Renders `CREATE TABLE IF NOT EXISTS t(col defs)` from the pending
/// column list, comma-joined in insertion order.
pub fn render_create_table(table: &str, columns: &[ColumnSpec]) -> String {
    let defs: Vec<String> = columns.iter().map(ColumnSpec::definition).collect();
    format!("CREATE TABLE IF NOT EXISTS {table}({})", defs.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_fragments() {
        assert_eq!(Constraint::None.render(), "");
        assert_eq!(Constraint::NotNull.render(), " NOT NULL");
        assert_eq!(Constraint::Unique.render(), " UNIQUE");
        assert_eq!(Constraint::PrimaryKey.render(), " PRIMARY KEY");
        assert_eq!(
            Constraint::Check("AGE > 0".to_string()).render(),
            " CHECK (AGE > 0)"
        );
        assert_eq!(
            Constraint::Default("0".to_string()).render(),
            " DEFAULT '0'"
        );
        assert_eq!(
            Constraint::NotNullDefault("x".to_string()).render(),
            " NOT NULL DEFAULT 'x'"
        );
    }

    #[test]
    fn create_table_lists_columns_in_insertion_order() {
        let columns = vec![
            ColumnSpec::new("ID", "INTEGER", Constraint::PrimaryKey),
            ColumnSpec::new("NAME", "TEXT", Constraint::NotNull),
            ColumnSpec::new("AGE", "INTEGER", Constraint::None),
        ];
        let sql = render_create_table("Users", &columns);
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS Users(ID INTEGER PRIMARY KEY, NAME TEXT NOT NULL, AGE INTEGER)"
        );
        assert_eq!(sql.matches("NAME").count(), 1);
    }
}
