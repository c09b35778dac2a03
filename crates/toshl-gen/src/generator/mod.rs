pub mod ast;
pub mod cache;
pub mod codegen;
pub mod config;
pub mod discovery;
pub mod fetch;
pub mod filter;
pub mod grouping;
pub mod materialize;
pub mod metrics;
pub mod orchestrator;
pub mod records;
pub mod registry;
pub mod repair;

#[cfg(test)]
mod tests;
