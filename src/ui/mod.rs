pub mod file_view;
pub mod panels;
pub mod plot;
