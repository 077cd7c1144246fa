pub mod downloader;
pub mod history;
pub mod system;
