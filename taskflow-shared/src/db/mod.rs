/// Database layer for TaskFlow
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - Models are in the `models` module at crate root level
///
/// The pool is a process-wide resource: created once at startup, shared via
/// application state, and never explicitly torn down (process-lifetime
/// scoped). sqlx pools are safe to share across concurrent requests, so no
/// application-level connect guard is needed.

pub mod pool;
