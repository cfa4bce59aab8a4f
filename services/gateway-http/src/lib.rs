pub mod auth;
pub mod config;
pub mod proxy;
pub mod routes;
pub mod server;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
