pub mod backend;
pub mod diagnostic_store;
pub mod document;
pub mod features;
pub mod service;
