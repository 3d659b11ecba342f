pub mod export;
pub mod margins;
pub mod navigation;
pub mod query;
pub mod repository;
pub mod service;
pub mod session;
pub mod tree;
