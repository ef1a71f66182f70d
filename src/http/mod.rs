mod client;
mod control;

pub use client::{HttpClient, PageFetcher};
pub use control::ScanControl;
