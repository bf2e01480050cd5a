pub mod api;
pub mod error;
pub mod ingest;
pub mod normalization;
pub mod query;
pub mod store;

pub mod util {
    pub mod env;
}

pub use store::db::Db;
