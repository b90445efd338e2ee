pub mod ai_service;
pub mod application_service;
pub mod candidate_service;
pub mod company_service;
pub mod job_service;
pub mod maintenance_service;
pub mod notification_service;
pub mod user_service;
