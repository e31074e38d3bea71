pub mod db;
pub mod store;
pub mod todo;
