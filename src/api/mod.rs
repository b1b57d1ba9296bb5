mod error;
mod health;
mod pages;
mod seed;
mod ws;

pub use error::ApiError;
pub use health::health_api;
pub use pages::{historical, live};
pub use seed::{dummy, settings};
pub use ws::{shutdown_frame, ws_live};
