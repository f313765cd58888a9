pub mod admin;
pub mod cart;
pub mod catalog;
pub mod order;
pub mod otp;
pub mod payment;
pub mod user;
