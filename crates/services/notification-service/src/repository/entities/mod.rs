//! SeaORM entities for the tables this service owns.

pub mod notification;
pub mod user_device;
