pub mod recipe;
pub mod stock;
