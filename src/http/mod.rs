//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, dispatch handler)
//!     → request.rs (request ID)
//!     → [routing layer picks preflight / index / upstream / static]
//!     → response.rs (build body, content headers)
//!     → cors.rs (CORS headers on every response)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::AppError;
pub use request::{MakeRequestUuid, RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
