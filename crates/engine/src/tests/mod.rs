//! Crate-level tests spanning profile resolution, ranking and cold start

mod ranking_properties;
