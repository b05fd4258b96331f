use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Outcome a manager can give a pending request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target_status(self) -> LeaveStatus {
        match self {
            Decision::Approve => LeaveStatus::Approved,
            Decision::Reject => LeaveStatus::Rejected,
        }
    }

    pub fn past_tense(self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

/// Leave request joined with the requesting employee's name.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequestView {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 3)]
    pub employee_id: i64,
    #[schema(example = "john_doe")]
    pub employee_name: String,
    #[schema(example = "2025-10-20", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2025-10-25", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family vacation")]
    pub reason: String,
    pub status: LeaveStatus,
}

/// What the decision handlers need to authorize and report a transition.
#[derive(Debug, sqlx::FromRow)]
pub struct DecisionTarget {
    pub id: i64,
    pub status: LeaveStatus,
    pub employee_name: String,
    pub owner_manager_id: Option<i64>,
}

/// A request that passed form validation, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decisions_map_to_terminal_states() {
        assert_eq!(Decision::Approve.target_status(), LeaveStatus::Approved);
        assert_eq!(Decision::Reject.target_status(), LeaveStatus::Rejected);
        assert_ne!(Decision::Approve.target_status(), LeaveStatus::Pending);
    }
}
