pub mod error;
pub mod pagination;

pub use error::CatalogError;
pub use pagination::Page;
