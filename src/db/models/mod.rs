//! Database models split into domain-specific modules.

pub mod alumni;
pub mod common;
pub mod connection;
pub mod dashboard;
pub mod mentorship;
pub mod profile;
pub mod request;
pub mod student;
pub mod user;

pub use alumni::*;
pub use common::*;
pub use connection::*;
pub use dashboard::*;
pub use mentorship::*;
pub use profile::*;
pub use request::*;
pub use student::*;
pub use user::*;
