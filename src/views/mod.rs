pub mod app_template;
pub mod edit;
pub mod list;
