pub mod auth;

pub use auth::vapi_secret_middleware;
