pub mod adapter;
pub mod config;
pub mod error;
pub mod handlers;
pub mod page;
pub mod server;
pub mod types;

pub use adapter::{AdapterError, ComposerClient};
pub use config::Config;
pub use server::{build_router, start_server};
pub use types::MessageRequest;
