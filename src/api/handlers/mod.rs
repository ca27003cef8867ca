pub mod ai;
pub mod booking;
pub mod health;
pub mod member;
pub mod resource;
