use crate::db::seed;
use crate::error::AppError;
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;

/// Drops and reseeds the whole database.
///
/// Unauthenticated, and only routed when `ALLOW_INITIALIZE_DB` is set.
#[utoipa::path(
    get,
    path = "/initialize_db",
    responses(
        (status = 200, description = "Schema recreated and sample data loaded", body = Object,
         example = json!({
            "message": "Database initialized successfully with sample users and data.",
            "employees": 4,
            "leave_requests": 2
         })),
        (status = 404, description = "Bootstrap route disabled")
    ),
    tag = "Admin"
)]
pub async fn initialize_db(pool: web::Data<SqlitePool>) -> Result<HttpResponse, AppError> {
    let summary = seed::reseed(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Database initialized successfully with sample users and data.",
        "employees": summary.employees,
        "leave_requests": summary.leave_requests,
    })))
}
