pub mod browse;
pub mod cache;
pub mod config;
pub mod list;
pub mod more;
pub mod search;
pub mod session;
pub mod show;
pub mod version;
