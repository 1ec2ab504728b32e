pub mod account;
pub mod registration;
pub mod role_users;
pub mod verification;
