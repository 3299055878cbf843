pub mod booking;
pub mod pricing;
pub mod room;
