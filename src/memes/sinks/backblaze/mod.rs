pub mod b2;
pub mod service;
pub mod structs;
