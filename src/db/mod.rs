pub mod contractdb;
pub mod db;
pub mod jobdb;
pub mod notificationdb;
pub mod reviewdb;
pub mod userdb;
