pub mod config;
pub mod engine;
pub mod network;
pub mod ops;
