pub mod generator;
pub mod pagination;
pub mod sample_store;
pub mod streaming;
