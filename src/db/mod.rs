pub mod employee;
pub mod leave_request;
pub mod seed;
pub mod session;

use sqlx::{SqliteConnection, SqlitePool};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Tables in creation order; dropped in reverse.
const TABLES: [&str; 3] = ["employees", "leave_requests", "sessions"];

const SCHEMA: [&str; 6] = [
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id            INTEGER PRIMARY KEY AUTOINCREMENT,
        name          TEXT    NOT NULL UNIQUE,
        password_hash TEXT    NOT NULL,
        rank          TEXT    NOT NULL CHECK (rank IN ('Employee', 'Manager', 'Admin')),
        manager_id    INTEGER NULL REFERENCES employees (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_employees_manager_id ON employees (manager_id)",
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        employee_id INTEGER NOT NULL REFERENCES employees (id),
        start_date  TEXT    NOT NULL,
        end_date    TEXT    NOT NULL,
        reason      TEXT    NOT NULL,
        status      TEXT    NOT NULL DEFAULT 'Pending'
                    CHECK (status IN ('Pending', 'Approved', 'Rejected'))
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_leave_requests_employee_id ON leave_requests (employee_id)",
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        jti         TEXT    PRIMARY KEY,
        employee_id INTEGER NOT NULL REFERENCES employees (id),
        expires_at  INTEGER NOT NULL,
        revoked     INTEGER NOT NULL DEFAULT 0
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_sessions_employee_id ON sessions (employee_id)",
];

pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    create_schema(&mut *pool.acquire().await?).await?;
    tracing::info!(database_url, "Database ready");

    Ok(pool)
}

/// Creates missing tables and indexes; existing data is left alone.
pub async fn create_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}

pub async fn drop_schema(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for table in TABLES.iter().rev() {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);

    // one connection that never expires, otherwise the in-memory database is lost
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory sqlite");

    let mut conn = pool.acquire().await.expect("connection");
    create_schema(&mut conn).await.expect("schema");
    drop(conn);
    pool
}
