pub mod cached_client;
pub mod client;
pub mod keys;
pub mod types;
