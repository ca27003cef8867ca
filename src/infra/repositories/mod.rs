pub mod sqlite_booking_repo;
pub mod sqlite_member_repo;
pub mod sqlite_resource_repo;
