pub mod context;
pub mod repository;
pub mod service;
