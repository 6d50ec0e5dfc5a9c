pub mod associations;
pub mod catalog_service;
pub mod file_artifacts;
pub mod storage;
pub mod write_transaction;
