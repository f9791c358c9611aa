/// Parsing and pattern matching over JavaScript/TypeScript sources.
pub mod languages;
pub mod parser;
pub mod query;
