pub mod config;
pub mod logging;

pub mod archive;
pub mod error;
pub mod http;
pub mod metadata;
pub mod naming;
pub mod service;
pub mod soundcloud;
pub mod storage;
