pub mod image_panel;
pub mod status;
pub mod text_list;
pub mod upload;
