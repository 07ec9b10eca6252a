//! Report store infrastructure - document store adapters and seeding

mod factory;
mod fuzzy;
mod in_memory;
mod postgres;
mod seed;

pub use factory::{ReportBackends, StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryReportStore;
pub use postgres::{PostgresConfig, PostgresReportStore};
pub use seed::{parse_reports, seed_from_file, seed_reports, SeedSummary};
