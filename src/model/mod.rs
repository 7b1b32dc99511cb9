pub mod attendance;
pub mod day_summary;
pub mod leave_request;
pub mod role;
