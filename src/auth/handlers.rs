use crate::{
    auth::{
        auth::AuthUser,
        jwt::{generate_session_token, now},
        password::{DUMMY_HASH, verify_password},
        session::{removal_cookie, resolve_actor, session_cookie},
    },
    config::Config,
    db,
    error::{AppError, LOGIN_PATH},
    models::LoginForm,
    utils::flash::{self, Flash},
};
use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct LoginPage {
    /// form fields expected by `POST /login`
    #[schema(example = json!(["name", "password"]))]
    pub fields: Vec<String>,
}

pub(crate) fn login_form() -> LoginPage {
    LoginPage {
        fields: vec!["name".to_string(), "password".to_string()],
    }
}

/// Sends the visitor to their dashboard, or to the login page when signed out.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 303, description = "Redirect to the dashboard for the current rank, or to /login")
    ),
    tag = "Auth"
)]
pub async fn home(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    let location = match resolve_actor(&req, pool.get_ref(), config.get_ref()).await? {
        Some(actor) => actor.rank.dashboard_path(),
        None => LOGIN_PATH,
    };
    Ok(flash::redirect(location))
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = LoginPage)
    ),
    tag = "Auth"
)]
pub async fn login_page(flash: Flash) -> HttpResponse {
    flash::render(StatusCode::OK, flash, login_form())
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(
        content = LoginForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Signed in; session cookie set, redirect to the rank's dashboard"),
        (status = 400, description = "Name or password missing"),
        (status = 401, description = "Incorrect username or password; login page with the message in `flash`",
         body = LoginPage,
         example = json!({"flash": ["Incorrect username or password"], "fields": ["name", "password"]}))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, form),
    fields(name = %form.name)
)]
pub async fn login(
    form: web::Form<LoginForm>,
    pool: web::Data<SqlitePool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if form.name.trim().is_empty() || form.password.is_empty() {
        info!("Validation failed: empty name or password");
        return Ok(flash::render(
            StatusCode::BAD_REQUEST,
            Flash(vec!["Username and password are required".to_string()]),
            login_form(),
        ));
    }

    debug!("Fetching employee from database");

    let employee = db::employee::find_by_name(pool.get_ref(), form.name.trim()).await?;

    // Unknown names still run one argon2 verification
    let stored_hash = employee
        .as_ref()
        .map_or(DUMMY_HASH, |employee| employee.password_hash.as_str());
    let verified = verify_password(&form.password, stored_hash);

    let employee = match employee {
        Some(employee) if verified => employee,
        Some(employee) => {
            info!(employee_id = employee.id, "Invalid credentials: password mismatch");
            return Err(AppError::InvalidCredentials);
        }
        None => {
            info!("Invalid credentials: unknown name");
            return Err(AppError::InvalidCredentials);
        }
    };

    debug!(employee_id = employee.id, "Password verified, issuing session");

    let (token, claims) = generate_session_token(
        employee.id,
        employee.name.clone(),
        &config.session_secret,
        config.session_ttl,
    )
    .map_err(|e| {
        error!(error = %e, "Failed to sign session token");
        AppError::Internal(e.into())
    })?;

    let purged = db::session::purge_stale(pool.get_ref(), now()).await?;
    if purged > 0 {
        debug!(purged, "Removed expired and revoked sessions");
    }
    db::session::insert(pool.get_ref(), &claims.jti, employee.id, claims.exp as i64).await?;

    info!(employee_id = employee.id, rank = %employee.rank, "Login successful");

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, employee.rank.dashboard_path()))
        .cookie(session_cookie(token, config.get_ref()))
        .finish())
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 303, description = "Session revoked, redirect to /login")
    ),
    security(("session_cookie" = [])),
    tag = "Auth"
)]
pub async fn logout(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, AppError> {
    db::session::revoke(pool.get_ref(), &auth.session_id).await?;

    info!(employee_id = auth.employee_id, name = %auth.name, "Logged out");

    let mut resp = flash::redirect_with(LOGIN_PATH, "You have been logged out.");
    resp.add_cookie(&removal_cookie())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to clear session cookie: {e}")))?;
    Ok(resp)
}
