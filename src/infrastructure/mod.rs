//! Infrastructure implementations

pub mod logging;
pub mod user;
