pub mod contents;
pub mod notion;
pub mod settings;
