//! The session: one store connection plus the mutable builder state
//! (target table, pending columns, filter, log verbosity).

use std::collections::BTreeMap;

use rusqlite::{params, params_from_iter, types::ValueRef, Connection};
use serde::{Deserialize, Serialize};

use crate::display::render_rows;
use crate::error::{Error, Result};
use crate::logs::{emit, LogLevel, MessageKind};
use crate::schema::{render_create_table, ColumnSpec, Constraint};

/// Map-form insert payload. Iterates in key order, which fixes the
/// generated column order.
pub type Record = BTreeMap<String, String>;

/// One decoded result row, keyed by column name. Engine NULLs render as
/// the literal `"NULL"`.
pub type Row = BTreeMap<String, String>;

/// Serializable session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the store file; `:memory:` for a transient store.
    pub path: String,
    #[serde(default)]
    pub log_level: LogLevel,
}

impl SessionConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            log_level: LogLevel::Off,
        }
    }

    pub fn with_log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }
}

/// A synchronous, single-threaded session over one SQLite store.
///
/// Holds exactly one connection for its lifetime; the connection is
/// released on [`Session::close`] or drop. Concurrent use from multiple
/// threads is unsupported and must be serialized by the caller.
pub struct Session {
    path: String,
    conn: Option<Connection>,
    table: String,
    columns: Vec<ColumnSpec>,
    filter: String,
    level: LogLevel,
}

impl Session {
    /// Opens the store immediately. On open failure the error is logged
    /// and the session is left closed; operations re-attempt the open and
    /// fail with [`Error::Open`] if the store is still unavailable.
    pub fn open(path: impl Into<String>, level: LogLevel) -> Self {
        let mut session = Self {
            path: path.into(),
            conn: None,
            table: String::new(),
            columns: Vec::new(),
            filter: String::new(),
            level,
        };
        let _ = session.conn();
        session
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::open(config.path.clone(), config.log_level)
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Drops the connection. A later operation reopens the store.
    pub fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.emit(MessageKind::Info, "closing store");
            if let Err((_, e)) = conn.close() {
                self.emit(MessageKind::Error, &format!("close failed: {e}"));
            }
        }
    }

    pub fn set_log_level(&mut self, level: LogLevel) {
        self.level = level;
    }

    // ---- table lifecycle -------------------------------------------------

    /// Binds the target table and discards any pending column specs.
    pub fn set_table(&mut self, table: impl Into<String>) -> &mut Self {
        self.columns.clear();
        self.table = table.into();
        self
    }

    /// Appends a pending column spec for the next [`Session::create_table`].
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        data_type: impl Into<String>,
        constraint: Constraint,
    ) -> &mut Self {
        self.columns.push(ColumnSpec::new(name, data_type, constraint));
        self
    }

    /// Creates the target table from the pending columns. Idempotent
    /// thanks to IF NOT EXISTS.
    pub fn create_table(&mut self) -> Result<()> {
        if self.table.is_empty() {
            self.emit(MessageKind::Error, "no target table set");
            return Err(Error::NoTable);
        }
        if self.columns.is_empty() {
            self.emit(MessageKind::Error, "no columns defined");
            return Err(Error::NoColumns(self.table.clone()));
        }
        let sql = render_create_table(&self.table, &self.columns);
        let message = format!("table {} created", self.table);
        self.run(&sql, &message)
    }

    /// Replaces the pending columns, then creates the target table.
    pub fn create_table_with(&mut self, columns: Vec<ColumnSpec>) -> Result<()> {
        self.columns = columns;
        self.create_table()
    }

    pub fn drop_table(&mut self, table: &str) -> Result<()> {
        let sql = format!("DROP TABLE {table}");
        self.run(&sql, &format!("table {table} dropped"))
    }

    pub fn rename_table(&mut self, old: &str, new: &str) -> Result<()> {
        let sql = format!("ALTER TABLE {old} RENAME TO {new}");
        self.run(&sql, &format!("table {old} renamed to {new}"))
    }

    // ---- column DDL (independent of session schema state) ----------------

    pub fn rename_column(&mut self, table: &str, old: &str, new: &str) -> Result<()> {
        let sql = format!("ALTER TABLE {table} RENAME COLUMN {old} TO {new}");
        self.run(&sql, &format!("column {old} renamed to {new} in {table}"))
    }

    pub fn add_table_column(
        &mut self,
        table: &str,
        column: &str,
        data_type: &str,
    ) -> Result<()> {
        let sql = format!("ALTER TABLE {table} ADD {column} {data_type}");
        self.run(&sql, &format!("column {column} added to {table}"))
    }

    pub fn drop_column(&mut self, table: &str, column: &str) -> Result<()> {
        let sql = format!("ALTER TABLE {table} DROP COLUMN {column}");
        self.run(&sql, &format!("column {column} dropped from {table}"))
    }

    // ---- data manipulation -----------------------------------------------

    /// Inserts one map-form record into the target table. Values are
    /// bound as parameters, so embedded quotes are safe here.
    pub fn insert_record(&mut self, record: &Record) -> Result<()> {
        if self.table.is_empty() {
            self.emit(MessageKind::Error, "no target table set");
            return Err(Error::NoTable);
        }
        if record.is_empty() {
            self.emit(MessageKind::Error, "record has no columns");
            return Err(Error::EmptyRecord);
        }
        let columns: Vec<&str> = record.keys().map(String::as_str).collect();
        let placeholders = vec!["?"; record.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            placeholders
        );
        match self.execute_with(&sql, params_from_iter(record.values())) {
            Ok(_) => {
                self.emit(MessageKind::Info, "record inserted");
                Ok(())
            }
            Err(e) => {
                self.emit(MessageKind::Error, &format!("insert failed: {e}"));
                Err(e)
            }
        }
    }

    /// Positional insert. Count and order must match the declared columns
    /// of the target table; that is the caller's obligation and is not
    /// validated here.
    pub fn insert_values(&mut self, values: &[String]) -> Result<()> {
        if self.table.is_empty() {
            self.emit(MessageKind::Error, "no target table set");
            return Err(Error::NoTable);
        }
        if values.is_empty() {
            self.emit(MessageKind::Error, "no values to insert");
            return Err(Error::EmptyRecord);
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        let sql = format!("INSERT INTO {} VALUES ({})", self.table, placeholders);
        match self.execute_with(&sql, params_from_iter(values.iter())) {
            Ok(_) => {
                self.emit(MessageKind::Info, "values inserted");
                Ok(())
            }
            Err(e) => {
                self.emit(MessageKind::Error, &format!("insert failed: {e}"));
                Err(e)
            }
        }
    }

    /// Inserts each record in sequence and returns how many succeeded.
    /// Not transactional: a failure partway leaves prior inserts
    /// committed, and later records are still attempted.
    pub fn insert_records(&mut self, records: &[Record]) -> usize {
        records
            .iter()
            .filter(|record| self.insert_record(record).is_ok())
            .count()
    }

    /// `UPDATE table SET column = value [WHERE condition]`. The value and
    /// condition are spliced verbatim; string literals must arrive quoted
    /// by the caller (see the quoting limitation in the crate docs).
    pub fn update_record(
        &mut self,
        table: &str,
        column: &str,
        value: &str,
        condition: Option<&str>,
    ) -> Result<()> {
        let mut sql = format!("UPDATE {table} SET {column} = {value}");
        if let Some(condition) = condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        self.run(&sql, &format!("record updated in {table}"))
    }

    /// Deletes rows from `table` (default: the session target). Without a
    /// condition every row goes, intentionally.
    pub fn remove_records(
        &mut self,
        table: Option<&str>,
        condition: Option<&str>,
    ) -> Result<()> {
        let table = match table {
            Some(table) => table.to_string(),
            None => {
                if self.table.is_empty() {
                    self.emit(MessageKind::Error, "no target table set");
                    return Err(Error::NoTable);
                }
                self.table.clone()
            }
        };
        let mut sql = format!("DELETE FROM {table}");
        if let Some(condition) = condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        self.run(&sql, &format!("records deleted from {table}"))
    }

    // ---- reads -----------------------------------------------------------

    /// `SELECT * FROM target [filter]`, rows in engine order.
    pub fn fetch_all(&mut self) -> Result<Vec<Row>> {
        if self.table.is_empty() {
            self.emit(MessageKind::Error, "no target table set");
            return Err(Error::NoTable);
        }
        let mut sql = format!("SELECT * FROM {}", self.table);
        if !self.filter.is_empty() {
            sql.push(' ');
            sql.push_str(&self.filter);
        }
        let result = self.query_rows(&sql);
        if let Err(ref e) = result {
            self.emit(MessageKind::Error, &format!("fetch failed: {e}"));
        }
        result
    }

    /// Prints the table's rows in declared column order (via
    /// `PRAGMA table_info`). The session filter does not apply here; an
    /// explicit condition does. An empty result set is only a diagnostic.
    pub fn show_table(&mut self, table: &str, condition: Option<&str>) -> Result<()> {
        if table.is_empty() {
            self.emit(MessageKind::Error, "no table name given");
            return Err(Error::NoTable);
        }
        let order = self.column_order(table)?;
        let mut sql = format!("SELECT * FROM {table}");
        if let Some(condition) = condition {
            sql.push_str(" WHERE ");
            sql.push_str(condition);
        }
        let rows = self.query_rows(&sql)?;
        if rows.is_empty() {
            self.emit(MessageKind::Info, &format!("no records in {table}"));
            return Ok(());
        }
        println!("{}", render_rows(&order, &rows));
        Ok(())
    }

    /// Prints every table in the store with its column and row counts.
    /// Debug utility; issues one introspection and one count query per
    /// table, plus the per-table SELECT of [`Session::show_table`].
    pub fn show_all(&mut self) -> Result<()> {
        let tables = {
            let conn = self.conn()?;
            let mut stmt =
                conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
            let names = stmt
                .query_map(params![], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<String>>>()?;
            names
        };
        println!("{} table(s) in store", tables.len());
        for table in &tables {
            let columns = self.column_order(table)?.len();
            let rows: i64 = {
                let sql = format!("SELECT COUNT(*) FROM {table}");
                let conn = self.conn()?;
                conn.query_row(&sql, params![], |row| row.get(0))?
            };
            println!("Table: {table} ({columns} columns, {rows} rows)");
            self.show_table(table, None)?;
        }
        Ok(())
    }

    // ---- filter ----------------------------------------------------------

    /// Appends `column op 'value'` to the session filter, `WHERE` on the
    /// first clause and `AND` after. The value is spliced verbatim.
    pub fn set_filter(&mut self, column: &str, value: &str, op: &str) -> &mut Self {
        if self.filter.is_empty() {
            self.filter.push_str("WHERE ");
        } else {
            self.filter.push_str(" AND ");
        }
        self.filter.push_str(&format!("{column} {op} '{value}'"));
        self
    }

    /// Resets the filter; subsequent fetches see all rows again.
    pub fn clear_filter(&mut self) -> &mut Self {
        self.filter.clear();
        self
    }

    /// The accumulated WHERE fragment, empty when no filter is set.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    // ---- raw -------------------------------------------------------------

    /// Forwards arbitrary SQL through the execution adapter. Scripts with
    /// multiple statements run to completion; row-returning statements
    /// are fine, their rows are discarded.
    pub fn run_query(&mut self, sql: &str) -> Result<()> {
        match self.execute_script(sql) {
            Ok(()) => {
                self.emit(MessageKind::Info, "query executed");
                Ok(())
            }
            Err(e) => {
                self.emit(MessageKind::Error, &format!("{e}"));
                Err(e)
            }
        }
    }

    // ---- execution adapter -----------------------------------------------

    /// Single chokepoint for mutating statements: logs the statement,
    /// ensures the connection is open, and forwards to the engine with
    /// the given bound parameters.
    fn execute_with<P: rusqlite::Params>(&mut self, sql: &str, params: P) -> Result<usize> {
        self.emit(MessageKind::Query, sql);
        let conn = self.conn()?;
        Ok(conn.execute(sql, params)?)
    }

    /// Forwards a raw, possibly multi-statement script to the engine,
    /// batch-stepping every statement.
    fn execute_script(&mut self, sql: &str) -> Result<()> {
        self.emit(MessageKind::Query, sql);
        let conn = self.conn()?;
        Ok(conn.execute_batch(sql)?)
    }

    /// Executes a parameterless statement and logs the outcome.
    fn run(&mut self, sql: &str, success: &str) -> Result<()> {
        match self.execute_with(sql, params![]) {
            Ok(_) => {
                self.emit(MessageKind::Info, success);
                Ok(())
            }
            Err(e) => {
                self.emit(MessageKind::Error, &format!("{e}"));
                Err(e)
            }
        }
    }

    /// Runs a SELECT and materializes every row as a name-keyed map.
    fn query_rows(&mut self, sql: &str) -> Result<Vec<Row>> {
        self.emit(MessageKind::Query, sql);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut rows = stmt.query(params![])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut decoded = Row::new();
            for (i, name) in names.iter().enumerate() {
                decoded.insert(name.clone(), decode_value(row.get_ref(i)?));
            }
            out.push(decoded);
        }
        Ok(out)
    }

    /// Declared column order of `table`, from `PRAGMA table_info`.
    fn column_order(&mut self, table: &str) -> Result<Vec<String>> {
        let sql = format!("PRAGMA table_info({table})");
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let names = stmt
            .query_map(params![], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Returns the open connection, reopening the store if a prior close
    /// happened.
    fn conn(&mut self) -> Result<&Connection> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => match Connection::open(&self.path) {
                Ok(conn) => {
                    self.emit(
                        MessageKind::Info,
                        &format!("store '{}' opened", self.path),
                    );
                    conn
                }
                Err(e) => {
                    self.emit(
                        MessageKind::Error,
                        &format!("cannot open store '{}': {e}", self.path),
                    );
                    return Err(Error::Open(e));
                }
            },
        };
        Ok(self.conn.insert(conn))
    }

    fn emit(&self, kind: MessageKind, message: &str) {
        emit(self.level, kind, message);
    }
}

/// Stringifies one engine value; NULL becomes the literal `"NULL"`.
fn decode_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
