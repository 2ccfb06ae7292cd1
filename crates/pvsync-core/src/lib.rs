pub mod config;
pub mod logging;

pub mod fetch;
pub mod http;
pub mod manifest;
pub mod normalize;
pub mod report;
pub mod retry;
pub mod storage;
pub mod subdivision;
pub mod url_model;
