pub mod contractmodel;
pub mod jobmodel;
pub mod notificationmodel;
pub mod reviewmodel;
pub mod usermodel;
