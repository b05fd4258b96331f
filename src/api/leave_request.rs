use crate::auth::auth::AuthUser;
use crate::auth::policy::Action;
use crate::db;
use crate::error::AppError;
use crate::model::leave_request::{Decision, LeaveRequestView, LeaveStatus, NewLeaveRequest};
use crate::utils::flash::{self, Flash};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::BTreeMap;
use utoipa::ToSchema;

const REQUIRED: &str = "This field is required.";
const BAD_DATE: &str = "Not a valid date value.";
const DATE_ORDER: &str = "End date must be after start date.";

/// Submitted as-is so a rejected form can be echoed back untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct LeaveForm {
    #[serde(default)]
    #[schema(example = "2025-10-20")]
    pub start_date: String,
    #[serde(default)]
    #[schema(example = "2025-10-25")]
    pub end_date: String,
    #[serde(default)]
    #[schema(example = "Family vacation")]
    pub reason: String,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq, ToSchema)]
pub struct FormErrors {
    /// field name -> message
    pub fields: BTreeMap<String, String>,
}

impl FormErrors {
    fn add(&mut self, field: &str, message: &str) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn messages(&self) -> Vec<String> {
        self.fields.values().cloned().collect()
    }

    #[cfg(test)]
    fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

fn parse_date(errors: &mut FormErrors, field: &str, raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, BAD_DATE);
            None
        }
    }
}

impl LeaveForm {
    pub fn validate(&self) -> Result<NewLeaveRequest, FormErrors> {
        let mut errors = FormErrors::default();

        let start_date = parse_date(&mut errors, "start_date", &self.start_date);
        let end_date = parse_date(&mut errors, "end_date", &self.end_date);

        let reason = self.reason.trim();
        if reason.is_empty() {
            errors.add("reason", REQUIRED);
        }

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                errors.add("end_date", DATE_ORDER);
            }
        }

        match (start_date, end_date) {
            (Some(start_date), Some(end_date)) if errors.is_empty() => Ok(NewLeaveRequest {
                start_date,
                end_date,
                reason: reason.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ApplyLeavePage {
    pub form: LeaveForm,
    pub errors: FormErrors,
}

#[derive(Serialize, ToSchema)]
pub struct MyRequestsPage {
    pub requests: Vec<LeaveRequestView>,
}

/* =========================
Submission form
========================= */
#[utoipa::path(
    get,
    path = "/apply_leave",
    responses(
        (status = 200, description = "Empty leave request form", body = ApplyLeavePage),
        (status = 303, description = "Not signed in")
    ),
    security(("session_cookie" = [])),
    tag = "Leave"
)]
pub async fn apply_leave_form(auth: AuthUser, flash: Flash) -> Result<HttpResponse, AppError> {
    auth.authorize(Action::SubmitRequest)?;

    Ok(flash::render(
        StatusCode::OK,
        flash,
        ApplyLeavePage {
            form: LeaveForm::default(),
            errors: FormErrors::default(),
        },
    ))
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/apply_leave",
    request_body(
        content = LeaveForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Stored as Pending, redirect to /my_requests"),
        (status = 400, description = "Validation failed; form echoed back", body = ApplyLeavePage),
        (status = 403, description = "Access restricted")
    ),
    security(("session_cookie" = [])),
    tag = "Leave"
)]
pub async fn apply_leave(
    auth: AuthUser,
    flash: Flash,
    pool: web::Data<SqlitePool>,
    form: web::Form<LeaveForm>,
) -> Result<HttpResponse, AppError> {
    auth.authorize(Action::SubmitRequest)?;

    let form = form.into_inner();
    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            tracing::debug!(employee_id = auth.employee_id, ?errors, "Leave form rejected");
            let mut messages = flash.0;
            messages.extend(errors.messages());
            return Ok(flash::render(
                StatusCode::BAD_REQUEST,
                Flash(messages),
                ApplyLeavePage { form, errors },
            ));
        }
    };

    let leave_id =
        db::leave_request::insert(pool.get_ref(), auth.employee_id, &request, LeaveStatus::Pending)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id = auth.employee_id, "Failed to create leave request");
                AppError::from(e)
            })?;

    tracing::info!(leave_id, employee_id = auth.employee_id, "Leave request submitted");

    Ok(flash::redirect_with(
        "/my_requests",
        "Your leave request has been submitted!",
    ))
}

/* =========================
Own requests
========================= */
#[utoipa::path(
    get,
    path = "/my_requests",
    responses(
        (status = 200, description = "The signed-in employee's requests, latest start first", body = MyRequestsPage),
        (status = 303, description = "Not signed in")
    ),
    security(("session_cookie" = [])),
    tag = "Leave"
)]
pub async fn my_requests(
    auth: AuthUser,
    flash: Flash,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    auth.authorize(Action::ViewOwnRequests)?;

    let requests = db::leave_request::list_for_employee(pool.get_ref(), auth.employee_id).await?;

    Ok(flash::render(StatusCode::OK, flash, MyRequestsPage { requests }))
}

async fn decide(
    auth: AuthUser,
    pool: &SqlitePool,
    leave_id: i64,
    decision: Decision,
) -> Result<HttpResponse, AppError> {
    // rank first, so non-managers learn nothing about which ids exist
    auth.authorize(Action::DecideRequests)?;

    let target = db::leave_request::find_decision_target(pool, leave_id)
        .await?
        .ok_or(AppError::NotFound("Leave request"))?;

    auth.authorize(Action::DecideRequestOf {
        owner_manager_id: target.owner_manager_id,
    })?;

    if target.status != LeaveStatus::Pending
        || !db::leave_request::decide(pool, target.id, decision.target_status()).await?
    {
        tracing::info!(leave_id, status = %target.status, "Leave request already decided");
        return Err(AppError::AlreadyDecided);
    }

    tracing::info!(
        leave_id,
        manager_id = auth.employee_id,
        status = %decision.target_status(),
        "Leave request decided"
    );

    Ok(flash::redirect_with(
        "/manager_dashboard",
        format!(
            "Leave request for {} has been {}.",
            target.employee_name,
            decision.past_tense()
        ),
    ))
}

/* =========================
Approve leave (manager of record)
========================= */
#[utoipa::path(
    get,
    path = "/approve/{request_id}",
    params(
        ("request_id" = i64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 303, description = "Approved, redirect to /manager_dashboard"),
        (status = 403, description = "Not the manager of the requesting employee"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request has already been decided")
    ),
    security(("session_cookie" = [])),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    decide(auth, pool.get_ref(), path.into_inner(), Decision::Approve).await
}

/* =========================
Reject leave (manager of record)
========================= */
#[utoipa::path(
    get,
    path = "/reject/{request_id}",
    params(
        ("request_id" = i64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 303, description = "Rejected, redirect to /manager_dashboard"),
        (status = 403, description = "Not the manager of the requesting employee"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request has already been decided")
    ),
    security(("session_cookie" = [])),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    decide(auth, pool.get_ref(), path.into_inner(), Decision::Reject).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(start: &str, end: &str, reason: &str) -> LeaveForm {
        LeaveForm {
            start_date: start.to_string(),
            end_date: end.to_string(),
            reason: reason.to_string(),
        }
    }

    #[test]
    fn valid_form_becomes_a_request() {
        let request = form("2025-10-20", "2025-10-25", "  Family vacation ").validate().unwrap();
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2025, 10, 20).unwrap());
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2025, 10, 25).unwrap());
        assert_eq!(request.reason, "Family vacation");
    }

    #[test]
    fn single_day_leave_is_fine() {
        assert!(form("2025-01-01", "2025-01-01", "Dentist").validate().is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let errors = form("2025-10-25", "2025-10-20", "Trip").validate().unwrap_err();
        assert_eq!(errors.get("end_date"), Some(DATE_ORDER));
        assert_eq!(errors.messages(), vec![DATE_ORDER.to_string()]);
    }

    #[test]
    fn every_field_is_required() {
        let errors = form("", " ", "   ").validate().unwrap_err();
        assert_eq!(errors.get("start_date"), Some(REQUIRED));
        assert_eq!(errors.get("end_date"), Some(REQUIRED));
        assert_eq!(errors.get("reason"), Some(REQUIRED));
    }

    #[test]
    fn malformed_dates_are_reported() {
        let errors = form("20/10/2025", "2025-02-30", "Trip").validate().unwrap_err();
        assert_eq!(errors.get("start_date"), Some(BAD_DATE));
        assert_eq!(errors.get("end_date"), Some(BAD_DATE));
        assert_eq!(errors.get("reason"), None);
    }
}
