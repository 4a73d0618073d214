pub mod auth;
pub mod courses;
pub mod media;
pub mod search;
pub mod users;
