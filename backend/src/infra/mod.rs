pub mod file_storage;
pub mod omdb;
pub mod terminal;
pub mod web;
