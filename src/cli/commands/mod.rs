pub mod activity;
pub mod api;
pub mod breaks;
pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod idle;
pub mod init;
pub mod log;
pub mod sessions;
pub mod status;
pub mod summary;
