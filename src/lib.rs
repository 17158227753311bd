pub mod ai_provider;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod language_selector;
pub mod listen;
pub mod presenter;
pub mod scanner;
pub mod speech;
