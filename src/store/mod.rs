pub mod db;
pub mod reconcile;

pub use db::Db;
