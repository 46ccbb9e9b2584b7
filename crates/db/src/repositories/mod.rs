//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod booking_repo;
pub mod notification_repo;
pub mod payment_repo;
pub mod room_repo;
pub mod service_request_repo;
pub mod user_repo;

pub use booking_repo::BookingRepo;
pub use notification_repo::NotificationRepo;
pub use payment_repo::PaymentRepo;
pub use room_repo::RoomRepo;
pub use service_request_repo::ServiceRequestRepo;
pub use user_repo::UserRepo;
