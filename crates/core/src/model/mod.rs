pub mod event;
pub mod song;
pub mod songplay;
pub mod status;
pub mod time;
pub mod user;
