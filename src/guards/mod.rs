pub mod ajax;
pub mod auth;
