//! Integration tests for running migrations against on-disk DuckDB files.
//!
//! Each test opens and reopens a database in a temp directory so the stored
//! version has to survive a fresh connection.

use duckdb::Connection;
use ff_migrate::{
    load_sql_dir, must_execute, MigrateConfig, MigrateError, Migration, Migrator, SqlMigration,
    StepResult,
};
use std::path::Path;

// ── Helpers ────────────────────────────────────────────────────────────

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get::<_, i64>(0)).unwrap()
}

fn version(conn: &Connection) -> i64 {
    count(conn, "SELECT version FROM schema_version")
}

fn write_sql(dir: &Path, name: &str, sql: &str) {
    std::fs::write(dir.join(name), sql).unwrap();
}

fn migrator() -> Migrator {
    Migrator::new(&MigrateConfig::default()).unwrap()
}

// ── Tests ──────────────────────────────────────────────────────────────

#[test]
fn version_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("app.duckdb");
    let steps = vec![
        SqlMigration::new("users", "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR)"),
        SqlMigration::new("seed", "INSERT INTO users VALUES (1, 'ada'), (2, 'grace')"),
    ];

    {
        let conn = Connection::open(&db_path).unwrap();
        let report = migrator().migrate(&conn, &steps).unwrap();
        assert!(report.bootstrapped);
        assert_eq!(report.to_version, 2);
    }

    let conn = Connection::open(&db_path).unwrap();
    assert_eq!(version(&conn), 2);
    let report = migrator().migrate(&conn, &steps).unwrap();
    assert_eq!(report.applied, 0);
    assert!(!report.bootstrapped);
    // The seed step did not run twice.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM users"), 2);
}

#[test]
fn sql_directory_grows_over_releases() {
    let dir = tempfile::tempdir().unwrap();
    let migrations = dir.path().join("migrations");
    std::fs::create_dir(&migrations).unwrap();
    let db_path = dir.path().join("app.duckdb");

    write_sql(&migrations, "0001_orders.sql", "CREATE TABLE orders (id INTEGER, amount DOUBLE);");
    write_sql(&migrations, "0002_seed.sql", "INSERT INTO orders VALUES (1, 9.5);");
    {
        let conn = Connection::open(&db_path).unwrap();
        migrator()
            .migrate(&conn, &load_sql_dir(&migrations).unwrap())
            .unwrap();
        conn.execute("INSERT INTO orders VALUES (2, 3.0)", []).unwrap();
    }

    write_sql(
        &migrations,
        "0003_status.sql",
        "ALTER TABLE orders ADD COLUMN status VARCHAR DEFAULT 'open';",
    );
    let conn = Connection::open(&db_path).unwrap();
    let report = migrator()
        .migrate(&conn, &load_sql_dir(&migrations).unwrap())
        .unwrap();

    assert_eq!(report.from_version, 2);
    assert_eq!(report.applied, 1);
    assert_eq!(version(&conn), 3);
    // Rows written by and after the earlier release are untouched.
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM orders"), 2);
    assert_eq!(
        count(&conn, "SELECT COUNT(*) FROM orders WHERE status = 'open'"),
        2
    );
}

#[test]
fn three_steps_with_failing_middle_step() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("app.duckdb");
    let steps: Vec<Box<dyn Migration>> = vec![
        Box::new(SqlMigration::new("a", "CREATE TABLE a (x INTEGER)")),
        Box::new(|conn: &Connection| -> StepResult {
            must_execute(conn, "CREATE TABLE b (x INTEGER)", []);
            must_execute(conn, "INSERT INTO missing_table VALUES (1)", []);
            Ok(())
        }),
        Box::new(SqlMigration::new("c", "CREATE TABLE c (x INTEGER)")),
    ];

    let conn = Connection::open(&db_path).unwrap();
    let err = migrator().migrate(&conn, &steps).unwrap_err();

    match &err {
        MigrateError::Step { version, source } => {
            assert_eq!(*version, 2);
            assert!(source.downcast_ref::<duckdb::Error>().is_some());
        }
        other => panic!("expected Step error, got {other:?}"),
    }
    assert!(err.to_string().contains("version 2"));
    assert_eq!(version(&conn), 1);
    assert_eq!(
        count(
            &conn,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = 'c'"
        ),
        0
    );
}

#[test]
fn schema_qualified_tracking_table() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("app.duckdb");
    let config_path = dir.path().join("migrate.yml");
    std::fs::write(&config_path, "table: ops.schema_version\n").unwrap();
    let config = MigrateConfig::load(&config_path).unwrap();
    let steps = vec![SqlMigration::new("t", "CREATE TABLE t (x INTEGER)")];

    let conn = Connection::open(&db_path).unwrap();
    Migrator::new(&config).unwrap().migrate(&conn, &steps).unwrap();

    assert_eq!(count(&conn, "SELECT version FROM ops.schema_version"), 1);
    assert_eq!(
        count(
            &conn,
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'main' AND table_name = 'schema_version'"
        ),
        0
    );
}
