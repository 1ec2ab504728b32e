//! sea-orm entities for the accounts service.

pub mod user_devices;
pub mod users;
