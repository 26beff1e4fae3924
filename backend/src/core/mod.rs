pub mod api_types;
pub mod app;
pub mod favorites;
pub mod input;
pub mod models;
pub mod search;
pub mod storage;
