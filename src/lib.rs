pub mod catalog;
pub mod config;
pub mod error;
pub mod lexical;
pub mod logging;
pub mod lsp;
pub mod parsers;
pub mod semantic;
