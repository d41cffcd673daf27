pub mod health;
pub mod pdf_upload;
