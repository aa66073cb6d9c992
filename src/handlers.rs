pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod reports;
pub mod reservations;
pub mod staff;
