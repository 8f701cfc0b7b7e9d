//! Core translation engine module

pub mod client;
pub mod config;
pub mod controller;
pub mod cost;
pub mod errors;
pub mod models;
pub mod session;
pub mod text;
