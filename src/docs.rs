use crate::api::dashboard::{AdminDashboard, EmployeeDashboard, ManagerDashboard};
use crate::api::leave_request::{ApplyLeavePage, FormErrors, LeaveForm, MyRequestsPage};
use crate::auth::handlers::LoginPage;
use crate::auth::session::SESSION_COOKIE;
use crate::model::employee::EmployeeView;
use crate::model::leave_request::{LeaveRequestView, LeaveStatus};
use crate::model::rank::Rank;
use crate::models::LoginForm;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Portal",
        version = "0.1.0",
        description = r#"
## Leave Portal

Internal leave management: employees submit leave requests, managers decide on
requests of their direct reports, administrators see everyone.

### 🔐 Security
Sign in with `POST /login`; the session travels in the `leave_session` cookie.
Unauthenticated calls to protected routes are redirected to `/login`, calls
outside the caller's rank answer **403 Access restricted**.

### 📦 Response Format
- Page views are JSON with a `flash` list of one-shot messages
- Successful form posts and decisions answer `303 See Other`
"#,
    ),
    paths(
        crate::auth::handlers::home,
        crate::auth::handlers::login_page,
        crate::auth::handlers::login,
        crate::auth::handlers::logout,

        crate::api::dashboard::employee_dashboard,
        crate::api::dashboard::manager_dashboard,
        crate::api::dashboard::admin_dashboard,

        crate::api::leave_request::apply_leave_form,
        crate::api::leave_request::apply_leave,
        crate::api::leave_request::my_requests,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::admin::initialize_db
    ),
    components(
        schemas(
            LoginForm,
            LoginPage,
            LeaveForm,
            FormErrors,
            ApplyLeavePage,
            MyRequestsPage,
            EmployeeDashboard,
            ManagerDashboard,
            AdminDashboard,
            EmployeeView,
            LeaveRequestView,
            LeaveStatus,
            Rank
        )
    ),
    modifiers(&SessionCookie),
    tags(
        (name = "Auth", description = "Sign in and out"),
        (name = "Dashboard", description = "Per-rank landing pages"),
        (name = "Leave", description = "Submitting and deciding leave requests"),
        (name = "Admin", description = "Development affordances"),
    )
)]
pub struct ApiDoc;

pub struct SessionCookie;

impl Modify for SessionCookie {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(SESSION_COOKIE))),
            );
        }
    }
}
