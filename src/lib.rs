pub mod archive;
pub mod catalog;
pub mod cleanup;
pub mod commands;
pub mod config;
pub mod download;
pub mod error;
pub mod http;
pub mod install;
pub mod launcher;
pub mod platform;
pub mod resolver;
pub mod runtime;
