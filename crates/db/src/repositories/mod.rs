//! Repository layer: one zero-sized struct per table, async fns over `&PgPool`.

pub mod history_repo;

pub use history_repo::HistoryRepo;
