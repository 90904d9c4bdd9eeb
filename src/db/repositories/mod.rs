pub mod director;
pub mod movie;
pub mod user;
