pub mod a001_product;
pub mod a002_transaction;
pub mod a003_project;
pub mod a004_chat;
pub mod d400_finance_report;
