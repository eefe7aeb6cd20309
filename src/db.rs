pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod memory_repo;
pub use memory_repo::InMemoryRepository;
