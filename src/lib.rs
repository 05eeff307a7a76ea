//! Fluent session layer over SQLite.
//!
//! # Intention
//!
//! - Build SQL statements from structured inputs: column specs, record
//!   maps, and filter clauses.
//! - Forward everything to SQLite via `rusqlite`; planning, storage, and
//!   transactions stay in the engine.
//! - Decode result rows into column-name-keyed maps.
//!
//! # Architectural Boundaries
//!
//! - Only statement construction, execution forwarding, and row mapping
//!   belong here.
//! - No pooling, no prepared-statement caching, no schema migrations,
//!   no query optimization.
//!
//! ```no_run
//! use sqlite_session::{Constraint, LogLevel, Record, Session};
//!
//! let mut db = Session::open("users.db", LogLevel::Off);
//! db.set_table("Users")
//!     .add_column("ID", "INTEGER", Constraint::None)
//!     .add_column("NAME", "TEXT", Constraint::NotNull)
//!     .create_table()?;
//! db.insert_record(&Record::from([
//!     ("ID".to_string(), "1".to_string()),
//!     ("NAME".to_string(), "Ali".to_string()),
//! ]))?;
//! let rows = db.fetch_all()?;
//! # Ok::<(), sqlite_session::Error>(())
//! ```

mod display;
pub mod error;
pub mod logs;
pub mod schema;
pub mod session;

pub use error::{Error, Result};
pub use logs::{init_tracing, LogLevel};
pub use schema::{ColumnSpec, Constraint};
pub use session::{Record, Row, Session, SessionConfig};
