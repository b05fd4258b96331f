pub mod admin;
pub mod dashboard;
pub mod leave_request;
