use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::rank::Rank;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    #[serde(skip)]
    pub password_hash: String,
    pub rank: Rank,
    pub manager_id: Option<i64>,
}

/// Employee as shown on dashboards; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "name": "john_doe",
        "rank": "Employee",
        "manager_id": 2,
        "manager_name": "manager"
    })
)]
pub struct EmployeeView {
    #[schema(example = 3)]
    pub id: i64,

    #[schema(example = "john_doe")]
    pub name: String,

    pub rank: Rank,

    #[schema(example = 2, nullable = true)]
    pub manager_id: Option<i64>,

    #[schema(example = "manager", nullable = true)]
    pub manager_name: Option<String>,
}
