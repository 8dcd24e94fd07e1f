//! HTTP front door for LinkFast: the JSON shorten API, the redirect route
//! and the single-page UI.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
