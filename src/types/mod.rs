pub mod config;
pub mod scorecard;
pub mod version;
