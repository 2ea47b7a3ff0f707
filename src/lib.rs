pub mod config;
pub mod errors;
pub mod logging;
pub mod lsp;
pub mod markup;
pub mod type_system;
