//! In-memory reference backend serving the REST surface the client consumes
//!
//! Used for local development (`cargo run`) and by the integration tests.

pub mod handlers;
pub mod request_id;
pub mod routes;
pub mod state;
pub mod taste;

pub use routes::create_router;
pub use state::AppState;
