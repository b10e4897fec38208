pub mod check;
pub mod fetch;
pub mod import;
pub mod oid;
pub mod patch;
