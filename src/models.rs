use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    #[serde(default)]
    #[schema(example = "john_doe")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "employee1_password")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// employee name
    pub sub: String,
    pub employee_id: i64,
    pub exp: usize,
    /// session id, matches `sessions.jti`
    pub jti: String,
}
