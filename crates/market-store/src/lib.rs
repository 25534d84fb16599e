pub mod db;
pub mod models;
pub mod store;

pub use db::MarketDb;
pub use models::*;
pub use store::{parse_timestamp, SqliteMarketStore};
