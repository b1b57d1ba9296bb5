pub mod seed_source;
pub mod store;
