pub mod chat;
pub mod product;
pub mod project;
pub mod transaction;
