use crate::auth::auth::AuthUser;
use crate::auth::policy::Action;
use crate::db;
use crate::error::AppError;
use crate::model::employee::EmployeeView;
use crate::model::leave_request::LeaveRequestView;
use crate::utils::flash::{self, Flash};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct EmployeeDashboard {
    pub profile: EmployeeView,
}

#[derive(Serialize, ToSchema)]
pub struct ManagerDashboard {
    /// direct reports
    pub team: Vec<EmployeeView>,
    /// pending requests of direct reports, soonest start first
    pub pending_requests: Vec<LeaveRequestView>,
}

#[derive(Serialize, ToSchema)]
pub struct AdminDashboard {
    pub all_users: Vec<EmployeeView>,
    /// every request in any state, latest start first
    pub all_requests: Vec<LeaveRequestView>,
}

#[utoipa::path(
    get,
    path = "/employee_dashboard",
    responses(
        (status = 200, description = "Own profile", body = EmployeeDashboard),
        (status = 303, description = "Not signed in"),
        (status = 403, description = "Access restricted")
    ),
    security(("session_cookie" = [])),
    tag = "Dashboard"
)]
pub async fn employee_dashboard(
    auth: AuthUser,
    flash: Flash,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    auth.authorize(Action::ViewOwnDashboard)?;

    let profile = db::employee::view_by_id(pool.get_ref(), auth.employee_id)
        .await?
        .ok_or(AppError::NotFound("Employee"))?;

    Ok(flash::render(StatusCode::OK, flash, EmployeeDashboard { profile }))
}

#[utoipa::path(
    get,
    path = "/manager_dashboard",
    responses(
        (status = 200, description = "Pending requests of direct reports", body = ManagerDashboard),
        (status = 303, description = "Not signed in"),
        (status = 403, description = "Access restricted")
    ),
    security(("session_cookie" = [])),
    tag = "Dashboard"
)]
pub async fn manager_dashboard(
    auth: AuthUser,
    flash: Flash,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    auth.authorize(Action::ViewManagerDashboard)?;

    let team = db::employee::managed_by(pool.get_ref(), auth.employee_id).await?;
    let pending_requests =
        db::leave_request::list_pending_for_manager(pool.get_ref(), auth.employee_id).await?;

    tracing::debug!(
        manager_id = auth.employee_id,
        team = team.len(),
        pending = pending_requests.len(),
        "Manager dashboard"
    );

    Ok(flash::render(
        StatusCode::OK,
        flash,
        ManagerDashboard {
            team,
            pending_requests,
        },
    ))
}

#[utoipa::path(
    get,
    path = "/admin_dashboard",
    responses(
        (status = 200, description = "All employees and all requests", body = AdminDashboard),
        (status = 303, description = "Not signed in"),
        (status = 403, description = "Access restricted")
    ),
    security(("session_cookie" = [])),
    tag = "Dashboard"
)]
pub async fn admin_dashboard(
    auth: AuthUser,
    flash: Flash,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    auth.authorize(Action::ViewAdminDashboard)?;

    let all_users = db::employee::list_views(pool.get_ref()).await?;
    let all_requests = db::leave_request::list_all(pool.get_ref()).await?;

    Ok(flash::render(
        StatusCode::OK,
        flash,
        AdminDashboard {
            all_users,
            all_requests,
        },
    ))
}
