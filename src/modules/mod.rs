pub mod accounts;
pub mod auth;
pub mod leaves;
pub mod schools;
pub mod teachers;
