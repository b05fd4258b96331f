use sqlx::SqlitePool;

pub async fn insert(
    pool: &SqlitePool,
    jti: &str,
    employee_id: i64,
    expires_at: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (jti, employee_id, expires_at) VALUES (?, ?, ?)")
        .bind(jti)
        .bind(employee_id)
        .bind(expires_at)
        .execute(pool)
        .await?;
    Ok(())
}

/// True when the session exists, belongs to `employee_id`, is not revoked and not expired.
pub async fn is_active(
    pool: &SqlitePool,
    jti: &str,
    employee_id: i64,
    now: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sessions
            WHERE jti = ? AND employee_id = ? AND revoked = 0 AND expires_at > ?
        )
        "#,
    )
    .bind(jti)
    .bind(employee_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Deletes sessions that can no longer authenticate anyone; returns how many went.
pub async fn purge_stale(pool: &SqlitePool, now: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE revoked = 1 OR expires_at <= ?")
        .bind(now)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Idempotent.
pub async fn revoke(pool: &SqlitePool, jti: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET revoked = 1 WHERE jti = ?")
        .bind(jti)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{employee, memory_pool};
    use crate::model::rank::Rank;

    #[actix_web::test]
    async fn revoked_and_expired_sessions_are_inactive() {
        let pool = memory_pool().await;
        let id = employee::insert(&pool, "me", "x", Rank::Employee, None).await.unwrap();

        insert(&pool, "live", id, 2_000).await.unwrap();
        insert(&pool, "old", id, 500).await.unwrap();

        assert!(is_active(&pool, "live", id, 1_000).await.unwrap());
        assert!(!is_active(&pool, "old", id, 1_000).await.unwrap());
        assert!(!is_active(&pool, "live", id + 1, 1_000).await.unwrap());
        assert!(!is_active(&pool, "missing", id, 1_000).await.unwrap());

        revoke(&pool, "live").await.unwrap();
        revoke(&pool, "live").await.unwrap();
        assert!(!is_active(&pool, "live", id, 1_000).await.unwrap());
    }

    #[actix_web::test]
    async fn purge_removes_only_dead_sessions() {
        let pool = memory_pool().await;
        let id = employee::insert(&pool, "me", "x", Rank::Employee, None).await.unwrap();

        insert(&pool, "live", id, 2_000).await.unwrap();
        insert(&pool, "expired", id, 1_000).await.unwrap();
        insert(&pool, "revoked", id, 2_000).await.unwrap();
        revoke(&pool, "revoked").await.unwrap();

        assert_eq!(purge_stale(&pool, 1_000).await.unwrap(), 2);
        assert_eq!(purge_stale(&pool, 1_000).await.unwrap(), 0);

        let remaining: Vec<String> = sqlx::query_scalar("SELECT jti FROM sessions")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, vec!["live".to_string()]);
        assert!(is_active(&pool, "live", id, 1_000).await.unwrap());
    }
}
