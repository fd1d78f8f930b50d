pub mod contracts;
pub mod jobs;
pub mod notifications;
pub mod reviews;
pub mod users;
