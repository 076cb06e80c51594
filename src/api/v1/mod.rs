/*
 * Responsibility
 * - v1 public surface (re-export of routes())
 */
pub mod handlers;
mod routes;

pub use routes::routes;
