pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod notify;
pub mod ocr;
pub mod pipeline;
pub mod scanner;
pub mod sink;
