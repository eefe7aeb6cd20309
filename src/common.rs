pub mod error;
pub mod row_lock;
pub mod units;
