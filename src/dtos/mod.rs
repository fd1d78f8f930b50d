pub mod contractdtos;
pub mod jobdtos;
pub mod notificationdtos;
pub mod reviewdtos;
pub mod userdtos;
