pub mod aggregate;
pub mod classify;
pub mod correlate;
pub mod error;
pub mod join;
pub mod profile;
