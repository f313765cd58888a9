pub mod cache;
pub mod cashfree;
pub mod cloudinary;
pub mod db;
