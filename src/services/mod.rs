pub mod booking;
pub mod instructions;
pub mod notification;
pub mod sessions;
