pub mod builder;
pub mod config;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod filter;
pub mod graph;
pub mod types;
pub mod visitor;
