use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration};
use sqlx::SqlitePool;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::{now, verify_token};
use crate::config::Config;
use crate::db;

pub const SESSION_COOKIE: &str = "leave_session";

pub fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::seconds(config.session_ttl as i64))
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// Resolves the current actor from the session cookie.
///
/// `Ok(None)` covers every flavour of "not signed in": no cookie, bad
/// signature, expired or revoked session, or an employee that no longer exists.
pub async fn resolve_actor(
    req: &HttpRequest,
    pool: &SqlitePool,
    config: &Config,
) -> Result<Option<AuthUser>, sqlx::Error> {
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return Ok(None);
    };

    let claims = match verify_token(cookie.value(), &config.session_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected session token");
            return Ok(None);
        }
    };

    if !db::session::is_active(pool, &claims.jti, claims.employee_id, now()).await? {
        tracing::debug!(jti = %claims.jti, "Session revoked or expired");
        return Ok(None);
    }

    let Some(employee) = db::employee::find_by_id(pool, claims.employee_id).await? else {
        return Ok(None);
    };

    Ok(Some(AuthUser {
        employee_id: employee.id,
        name: employee.name,
        rank: employee.rank,
        session_id: claims.jti,
    }))
}
