use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::SqlitePool;

use super::{create_schema, drop_schema, employee, leave_request};
use crate::auth::password::hash_password;
use crate::model::leave_request::{LeaveStatus, NewLeaveRequest};
use crate::model::rank::Rank;

/// Baseline accounts: (name, password, rank, managed by `manager`).
const ACCOUNTS: [(&str, &str, Rank, bool); 4] = [
    ("admin", "admin_password", Rank::Admin, false),
    ("manager", "manager_password", Rank::Manager, false),
    ("john_doe", "employee1_password", Rank::Employee, true),
    ("jane_smith", "employee2_password", Rank::Employee, true),
];

/// Sample requests: (owner, start, end, reason, status).
const SAMPLE_REQUESTS: [(&str, (i32, u32, u32), (i32, u32, u32), &str, LeaveStatus); 2] = [
    ("john_doe", (2025, 10, 20), (2025, 10, 25), "Family vacation", LeaveStatus::Pending),
    ("jane_smith", (2025, 9, 5), (2025, 9, 7), "Medical appointment", LeaveStatus::Approved),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub employees: usize,
    pub leave_requests: usize,
}

fn date((y, m, d): (i32, u32, u32)) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).with_context(|| format!("invalid seed date {y}-{m}-{d}"))
}

/// Drops every table, recreates the schema and loads the sample data.
///
/// Destructive: all employees, requests and sessions are lost.
pub async fn reseed(pool: &SqlitePool) -> Result<SeedSummary> {
    // hash before opening the transaction, argon2 is slow
    let mut hashed = Vec::with_capacity(ACCOUNTS.len());
    for (name, password, rank, managed) in ACCOUNTS {
        let hash = hash_password(password)
            .map_err(|e| anyhow::anyhow!("failed to hash password for {name}: {e}"))?;
        hashed.push((name, hash, rank, managed));
    }

    let mut tx = pool.begin().await.context("begin reseed transaction")?;

    drop_schema(&mut tx).await.context("drop schema")?;
    create_schema(&mut tx).await.context("create schema")?;

    let mut summary = SeedSummary::default();
    let mut manager_id = None;
    let mut ids = Vec::with_capacity(hashed.len());

    for (name, hash, rank, managed) in &hashed {
        let reports_to = if *managed { manager_id } else { None };
        let id = employee::insert(&mut *tx, name, hash, *rank, reports_to)
            .await
            .with_context(|| format!("insert employee {name}"))?;
        if *rank == Rank::Manager {
            manager_id = Some(id);
        }
        ids.push((*name, id));
        summary.employees += 1;
    }

    for (owner, start, end, reason, status) in SAMPLE_REQUESTS {
        let owner_id = ids
            .iter()
            .find(|(name, _)| *name == owner)
            .map(|(_, id)| *id)
            .with_context(|| format!("unknown seed owner {owner}"))?;
        let request = NewLeaveRequest {
            start_date: date(start)?,
            end_date: date(end)?,
            reason: reason.to_string(),
        };
        leave_request::insert(&mut *tx, owner_id, &request, status)
            .await
            .with_context(|| format!("insert leave request for {owner}"))?;
        summary.leave_requests += 1;
    }

    tx.commit().await.context("commit reseed")?;

    tracing::warn!(
        employees = summary.employees,
        leave_requests = summary.leave_requests,
        "Database reinitialized with sample data"
    );

    Ok(summary)
}
