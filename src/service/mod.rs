pub mod background_jobs;
pub mod change_request_service;
pub mod contract_service;
pub mod error;
pub mod job_service;
pub mod notification_service;
pub mod realtime;
pub mod review_service;
pub mod version_service;
