use sqlx::{SqliteExecutor, SqlitePool};

use crate::model::employee::{Employee, EmployeeView};
use crate::model::rank::Rank;

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, name, password_hash, rank, manager_id FROM employees WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, name, password_hash, rank, manager_id FROM employees WHERE name = ?",
    )
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Inserts an employee and returns its id.
pub async fn insert<'e, E>(
    executor: E,
    name: &str,
    password_hash: &str,
    rank: Rank,
    manager_id: Option<i64>,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "INSERT INTO employees (name, password_hash, rank, manager_id) VALUES (?, ?, ?, ?)",
    )
    .bind(name)
    .bind(password_hash)
    .bind(rank)
    .bind(manager_id)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

const VIEW_SELECT: &str = r#"
    SELECT e.id, e.name, e.rank, e.manager_id, m.name AS manager_name
    FROM employees e
    LEFT JOIN employees m ON m.id = e.manager_id
"#;

pub async fn view_by_id(pool: &SqlitePool, id: i64) -> Result<Option<EmployeeView>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeView>(&format!("{VIEW_SELECT} WHERE e.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_views(pool: &SqlitePool) -> Result<Vec<EmployeeView>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeView>(&format!("{VIEW_SELECT} ORDER BY e.id"))
        .fetch_all(pool)
        .await
}

/// Employees whose `manager_id` is `manager_id`.
pub async fn managed_by(
    pool: &SqlitePool,
    manager_id: i64,
) -> Result<Vec<EmployeeView>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeView>(&format!("{VIEW_SELECT} WHERE e.manager_id = ? ORDER BY e.id"))
        .bind(manager_id)
        .fetch_all(pool)
        .await
}
