use crate::auth::session::resolve_actor;
use crate::config::Config;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use sqlx::SqlitePool;

/// Gate for every protected route: no valid session means a redirect to `/login`.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("App config missing"))?;
    let pool = req
        .app_data::<Data<SqlitePool>>()
        .cloned()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Database pool missing"))?;

    let resolved = resolve_actor(req.request(), pool.get_ref(), config.get_ref()).await;

    let error = match resolved {
        Ok(Some(auth_user)) => {
            req.extensions_mut().insert(auth_user);
            return next.call(req).await;
        }
        Ok(None) => AppError::Unauthenticated,
        Err(e) => AppError::from(e),
    };

    Ok(req.into_response(error.error_response()))
}
