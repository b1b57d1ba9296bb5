pub mod registry;
pub mod stream_loop;
