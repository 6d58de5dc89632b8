/// Middleware modules for the API server
///
/// - `auth`: Bearer token authorization gate
/// - `security`: Security response headers

pub mod auth;
pub mod security;
