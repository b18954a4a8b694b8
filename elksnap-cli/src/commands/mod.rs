pub mod prune;
pub mod repo;
