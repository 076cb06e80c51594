/*
 * Responsibility
 * - public surface of the middleware layer (re-exports)
 * - gate::apply(...) for authentication, http::apply(...) for transport concerns
 */
pub mod gate;
pub mod http;
