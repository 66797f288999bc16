pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod extractor;
pub mod upstream;
