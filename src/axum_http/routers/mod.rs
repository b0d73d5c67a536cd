pub mod access;
pub mod admin;
pub mod analysis;
pub mod billing;
