pub mod availability_service;
pub mod booking_service;
pub mod channel;
pub mod dates;
pub mod pricing_service;
pub mod quote_service;
