pub mod config;
pub mod connection;
pub mod constants;
pub mod wallet;
