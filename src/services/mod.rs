pub mod catalog_service;
pub mod check_service;
pub mod report_service;
pub mod schedule_service;
pub mod sop_service;
pub mod template_service;
pub mod user_service;
