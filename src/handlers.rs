pub mod recipes;
pub mod sales;
pub mod stock;
