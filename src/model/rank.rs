use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of ranks; stored as its variant name in `employees.rank`.
#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    sqlx::Type,
    Display,
    EnumString,
    ToSchema,
)]
pub enum Rank {
    Employee,
    Manager,
    Admin,
}

impl Rank {
    /// Landing page after login or when visiting `/`.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Rank::Admin => "/admin_dashboard",
            Rank::Manager => "/manager_dashboard",
            Rank::Employee => "/employee_dashboard",
        }
    }
}
