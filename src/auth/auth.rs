use crate::auth::policy::{self, Action, Subject};
use crate::error::AppError;
use crate::model::rank::Rank;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// The signed-in employee, attached to the request by `auth_middleware`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub employee_id: i64,
    pub name: String,
    pub rank: Rank,

    /// `jti` of the session this request was authenticated with
    pub session_id: String,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or(AppError::Unauthenticated),
        )
    }
}

impl AuthUser {
    pub fn subject(&self) -> Subject {
        Subject {
            employee_id: self.employee_id,
            rank: self.rank,
        }
    }

    pub fn authorize(&self, action: Action) -> Result<(), AppError> {
        policy::authorize(self.subject(), action)
    }
}
