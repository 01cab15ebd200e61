pub mod assignments;
pub mod auth;
pub mod features;
pub mod submissions;
