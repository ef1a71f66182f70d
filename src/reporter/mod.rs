mod sitemap;
mod console;
mod export;

pub use console::ConsoleReporter;
pub use export::{JsonExporter, HtmlExporter};
pub use sitemap::{SiteMap, SiteMapEntry};
