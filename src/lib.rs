pub mod app;
pub mod cli;
pub mod config;
pub mod filter;
pub mod intake;
pub mod status;
pub mod store;
pub mod tracker;
pub mod utils;
pub mod view;

#[cfg(test)]
mod tests;
