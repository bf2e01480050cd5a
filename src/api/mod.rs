// HTTP read path: a stateless episode-filter endpoint plus health probe.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
