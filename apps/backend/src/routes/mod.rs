pub mod account;
pub mod auth;
pub mod sessions;
pub mod sets;
pub mod study;
