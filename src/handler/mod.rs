pub mod auth;
pub mod dashboard;
pub mod references;
pub mod settlement;
pub mod users;
