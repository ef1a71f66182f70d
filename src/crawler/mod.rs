mod engine;
mod links;
mod normalize;

pub use engine::Crawler;
pub use links::extract_links;
pub use normalize::normalize;
