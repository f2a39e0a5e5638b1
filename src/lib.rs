#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod formats;
pub mod layout;
pub mod logging;
pub mod notify;
pub mod pipeline;
pub mod report;
pub mod urls;
