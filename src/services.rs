pub mod auth;
pub mod booking_rules;
pub mod customer;
pub mod document;
pub mod report;
pub mod reservation;
pub mod staff;
