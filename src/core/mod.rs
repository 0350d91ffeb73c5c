pub mod calculator;
pub mod log;
pub mod service;
