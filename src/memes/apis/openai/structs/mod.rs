pub mod openai_chat_completion_response;
pub mod openai_generate_image_response;
