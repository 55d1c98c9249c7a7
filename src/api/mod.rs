pub mod handlers;
pub mod metrics;
pub mod server;

pub use server::{init_tracing, router, run_api_mode};
