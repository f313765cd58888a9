//! sea-orm entities for the store database.

pub mod banners;
pub mod carts;
pub mod categories;
pub mod orders;
pub mod outbox_events;
pub mod products;
pub mod users;
