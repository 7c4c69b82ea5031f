//! Estate News - a multi-source real-estate feed aggregation service
//!
//! This crate fetches RSS 2.0 and Atom feeds from a static per-category
//! registry, normalizes their items into canonical articles, and serves
//! ranked, paginated, and search-filtered views over the merged set via a
//! small JSON API. Individual feed failures are tolerated: a feed that times
//! out or returns malformed XML simply contributes zero articles.

pub mod aggregator;
pub mod article;
pub mod config;
pub mod fetcher;
pub mod parser;
pub mod registry;
pub mod routes;
