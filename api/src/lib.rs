pub mod extractor;
pub mod handler;
pub mod model;
pub mod rate_limit;
pub mod route;
