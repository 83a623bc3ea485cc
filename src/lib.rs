pub mod common;
pub mod config;
pub mod map;
pub mod scenario;
pub mod search;
pub mod stat;
