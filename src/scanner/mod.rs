mod context;

pub use context::ScanContext;
