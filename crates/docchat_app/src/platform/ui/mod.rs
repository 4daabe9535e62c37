pub mod constants;
pub mod input_buffer;
pub mod layout;
pub mod render;
pub mod view_state;
