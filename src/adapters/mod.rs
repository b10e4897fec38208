pub mod db;
pub mod xlsx;
