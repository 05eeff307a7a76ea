//! Demonstration entry point: opens one store, defines one schema, and
//! inspects the result.

use anyhow::Result;
use sqlite_session::{init_tracing, Constraint, LogLevel, Record, Session};

fn record(pairs: &[(&str, &str)]) -> Record {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn main() -> Result<()> {
    init_tracing("sqlite_session=debug");

    let mut db = Session::open("mydatabase.db", LogLevel::All);
    db.set_table("Users")
        .add_column("ID", "INTEGER", Constraint::Default("0".to_string()))
        .add_column("NAME", "TEXT", Constraint::NotNull)
        .add_column("AGE", "INTEGER", Constraint::None)
        .create_table()?;

    db.insert_record(&record(&[("ID", "1"), ("NAME", "Ali"), ("AGE", "25")]))?;
    db.insert_record(&record(&[("NAME", "Omar"), ("AGE", "20")]))?;
    let inserted = db.insert_records(&[
        record(&[("ID", "2"), ("NAME", "Mahmoud"), ("AGE", "19")]),
        record(&[("ID", "3"), ("NAME", "Gamal"), ("AGE", "35")]),
    ]);
    println!("{inserted} record(s) inserted");

    db.set_filter("AGE", "20", ">");
    for row in db.fetch_all()? {
        println!("{row:?}");
    }
    db.clear_filter();

    db.show_all()?;
    Ok(())
}
