pub mod api_error;
pub mod bearer_from_request;
pub mod json_from_request;
