pub mod config;
pub mod migrator;
pub mod options;
pub mod statements;
pub mod storage;
pub mod types;
