pub mod app;
pub mod clock;
pub mod config;
pub mod errors;
pub mod export;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod state;
pub mod stats;
pub mod store;
pub mod sync;
pub mod timeline;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
