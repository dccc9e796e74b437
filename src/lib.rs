pub mod api;
pub mod cache;
pub mod config;
pub mod data_models;
pub mod detail_parser;
pub mod engine;
pub mod error;
pub mod extract;
pub mod fetcher;
pub mod listing_parser;
pub mod metadata;
pub mod params;
pub mod search;
