use sqlx::{SqliteExecutor, SqlitePool};

use crate::model::leave_request::{DecisionTarget, LeaveRequestView, LeaveStatus, NewLeaveRequest};

const VIEW_SELECT: &str = r#"
    SELECT lr.id, lr.employee_id, e.name AS employee_name,
           lr.start_date, lr.end_date, lr.reason, lr.status
    FROM leave_requests lr
    JOIN employees e ON e.id = lr.employee_id
"#;

/// Stores a request owned by `employee_id` and returns its id.
pub async fn insert<'e, E>(
    executor: E,
    employee_id: i64,
    request: &NewLeaveRequest,
    status: LeaveStatus,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests (employee_id, start_date, end_date, reason, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(&request.reason)
    .bind(status)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// The employee's own requests, latest start first.
pub async fn list_for_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<Vec<LeaveRequestView>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequestView>(&format!(
        "{VIEW_SELECT} WHERE lr.employee_id = ? ORDER BY lr.start_date DESC, lr.id DESC"
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await
}

/// Pending requests of the manager's direct reports, soonest start first.
pub async fn list_pending_for_manager(
    pool: &SqlitePool,
    manager_id: i64,
) -> Result<Vec<LeaveRequestView>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequestView>(&format!(
        "{VIEW_SELECT} WHERE e.manager_id = ? AND lr.status = ? \
         ORDER BY lr.start_date ASC, lr.id ASC"
    ))
    .bind(manager_id)
    .bind(LeaveStatus::Pending)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<LeaveRequestView>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequestView>(&format!(
        "{VIEW_SELECT} ORDER BY lr.start_date DESC, lr.id DESC"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_decision_target(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<DecisionTarget>, sqlx::Error> {
    sqlx::query_as::<_, DecisionTarget>(
        r#"
        SELECT lr.id, lr.status, e.name AS employee_name, e.manager_id AS owner_manager_id
        FROM leave_requests lr
        JOIN employees e ON e.id = lr.employee_id
        WHERE lr.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Moves a Pending request to `status`.
///
/// Returns `false` when the request was no longer Pending, so two concurrent
/// decisions cannot both land.
pub async fn decide(pool: &SqlitePool, id: i64, status: LeaveStatus) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE leave_requests SET status = ? WHERE id = ? AND status = ?")
        .bind(status)
        .bind(id)
        .bind(LeaveStatus::Pending)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{employee, memory_pool};
    use crate::model::rank::Rank;
    use chrono::NaiveDate;

    fn request(start: (i32, u32, u32), end: (i32, u32, u32), reason: &str) -> NewLeaveRequest {
        NewLeaveRequest {
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            reason: reason.to_string(),
        }
    }

    #[actix_web::test]
    async fn pending_listing_is_scoped_and_ascending() {
        let pool = memory_pool().await;
        let boss = employee::insert(&pool, "boss", "x", Rank::Manager, None).await.unwrap();
        let other = employee::insert(&pool, "other", "x", Rank::Manager, None).await.unwrap();
        let mine = employee::insert(&pool, "mine", "x", Rank::Employee, Some(boss)).await.unwrap();
        let theirs = employee::insert(&pool, "theirs", "x", Rank::Employee, Some(other))
            .await
            .unwrap();

        let late = insert(&pool, mine, &request((2025, 12, 1), (2025, 12, 2), "late"), LeaveStatus::Pending)
            .await
            .unwrap();
        let early = insert(&pool, mine, &request((2025, 11, 1), (2025, 11, 2), "early"), LeaveStatus::Pending)
            .await
            .unwrap();
        insert(&pool, mine, &request((2025, 10, 1), (2025, 10, 2), "done"), LeaveStatus::Approved)
            .await
            .unwrap();
        insert(&pool, theirs, &request((2025, 9, 1), (2025, 9, 2), "not mine"), LeaveStatus::Pending)
            .await
            .unwrap();

        let ids: Vec<i64> = list_pending_for_manager(&pool, boss)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[actix_web::test]
    async fn own_listing_is_descending() {
        let pool = memory_pool().await;
        let me = employee::insert(&pool, "me", "x", Rank::Employee, None).await.unwrap();
        let first = insert(&pool, me, &request((2025, 1, 1), (2025, 1, 1), "a"), LeaveStatus::Pending)
            .await
            .unwrap();
        let second = insert(&pool, me, &request((2025, 6, 1), (2025, 6, 3), "b"), LeaveStatus::Rejected)
            .await
            .unwrap();

        let listed = list_for_employee(&pool, me).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second, first]);
        assert_eq!(listed[0].status, LeaveStatus::Rejected);
        assert_eq!(listed[0].employee_name, "me");
    }

    #[actix_web::test]
    async fn decide_only_moves_pending_requests() {
        let pool = memory_pool().await;
        let me = employee::insert(&pool, "me", "x", Rank::Employee, None).await.unwrap();
        let id = insert(&pool, me, &request((2025, 1, 1), (2025, 1, 2), "trip"), LeaveStatus::Pending)
            .await
            .unwrap();

        assert!(decide(&pool, id, LeaveStatus::Approved).await.unwrap());
        assert!(!decide(&pool, id, LeaveStatus::Rejected).await.unwrap());

        let stored = list_for_employee(&pool, me).await.unwrap();
        assert_eq!(stored[0].status, LeaveStatus::Approved);
        assert!(!decide(&pool, 9999, LeaveStatus::Approved).await.unwrap());
    }

    #[actix_web::test]
    async fn decision_target_carries_owner_manager() {
        let pool = memory_pool().await;
        let boss = employee::insert(&pool, "boss", "x", Rank::Manager, None).await.unwrap();
        let me = employee::insert(&pool, "me", "x", Rank::Employee, Some(boss)).await.unwrap();
        let id = insert(&pool, me, &request((2025, 1, 1), (2025, 1, 2), "trip"), LeaveStatus::Pending)
            .await
            .unwrap();

        let target = find_decision_target(&pool, id).await.unwrap().unwrap();
        assert_eq!(target.owner_manager_id, Some(boss));
        assert_eq!(target.employee_name, "me");
        assert_eq!(target.status, LeaveStatus::Pending);
        assert!(find_decision_target(&pool, id + 1).await.unwrap().is_none());
    }
}
