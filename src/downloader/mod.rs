// src/downloader/mod.rs

mod dispatcher;
mod job;
mod proxy;

pub use job::WatermarkFreeResolver;
pub use proxy::{MediaProxy, ProxiedMedia};
