//! Main module for rql library functionality

pub mod ast;
pub mod building;
pub mod config;
pub mod engine;
pub mod formats;
pub mod grammar;
pub mod highlight;
pub mod lexing;
pub mod logging;
pub mod parsing;
pub mod testing;
