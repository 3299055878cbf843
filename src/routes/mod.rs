pub mod admin;
pub mod availability;
pub mod booking;
pub mod health;
pub mod payment;
pub mod quote;
pub mod room;
