pub mod downloader;
pub mod naming;
pub mod ordering;
pub mod pipeline;
