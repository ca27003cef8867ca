pub mod booking;
pub mod member;
pub mod resource;
pub mod suggestion;
