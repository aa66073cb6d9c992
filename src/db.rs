pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod staff_repo;
pub use staff_repo::StaffRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;
pub mod report_repo;
pub use report_repo::ReportRepository;
