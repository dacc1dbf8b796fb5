//! Request handler module
//!
//! Route table construction and the handlers behind it: static assets,
//! the admin surface, and chirp validation.

pub mod admin;
pub mod chirps;
pub mod router;
pub mod static_files;

pub use router::Router;
