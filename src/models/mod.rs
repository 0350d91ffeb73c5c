pub mod activity;
pub mod break_session;
pub mod idle_session;
pub mod session_status;
pub mod summary;
pub mod work_session;
