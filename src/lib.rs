pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod output;
pub mod pagination;
pub mod render;
pub mod viewer;

#[cfg(test)]
mod tests;
