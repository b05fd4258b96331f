use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

use crate::auth::handlers::login_form;
use crate::utils::flash::{self, Flash};

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Display)]
pub enum AppError {
    /// No valid session; answered with a redirect to the login page.
    #[display(fmt = "authentication required")]
    Unauthenticated,

    #[display(fmt = "Incorrect username or password")]
    InvalidCredentials,

    #[display(fmt = "Access restricted")]
    Forbidden,

    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Leave request has already been decided")]
    AlreadyDecided,

    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "internal error: {}", _0)]
    Internal(anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        AppError::Internal(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::SEE_OTHER,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyDecided => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, LOGIN_PATH))
                .finish(),
            AppError::InvalidCredentials => flash::render(
                self.status_code(),
                Flash(vec![self.to_string()]),
                login_form(),
            ),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                HttpResponse::InternalServerError().json(json!({
                    "error": "Internal Server Error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(json!({
                "error": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_redirects_to_login() {
        let resp = AppError::Unauthenticated.error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
    }

    #[test]
    fn forbidden_is_a_hard_403() {
        let resp = AppError::Forbidden.error_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get(header::LOCATION).is_none());
    }

    #[test]
    fn database_details_stay_out_of_the_message() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::NotFound("Leave request").to_string(), "Leave request not found");
    }
}
