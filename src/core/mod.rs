pub mod backend;
pub mod history;
pub mod logging;
