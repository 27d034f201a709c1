pub mod controller;
pub mod errors;
pub mod models;
pub mod service;
