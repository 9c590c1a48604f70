pub mod file_size;
pub mod handlers;
pub mod scorer;
