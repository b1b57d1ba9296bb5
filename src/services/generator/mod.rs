pub mod record_generator;
