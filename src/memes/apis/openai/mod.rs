pub mod client;
pub mod structs;
