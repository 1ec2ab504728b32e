pub mod db;
pub mod delivery;
pub mod password;
pub mod registry;
