pub mod movement_service;
pub use movement_service::MovementService;
pub mod stock_service;
pub use stock_service::StockService;
pub mod recipe_service;
pub use recipe_service::RecipeService;
pub mod sale_service;
pub use sale_service::SaleService;
