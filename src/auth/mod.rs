pub mod controller;
pub mod dtos;
pub mod jwt;
pub mod models;
pub mod service;
