pub mod db;
pub mod query;
pub mod schema;
pub mod write;

pub use db::Store;
pub use write::FileTx;
