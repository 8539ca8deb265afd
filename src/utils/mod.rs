// Utilities module - storage, clock handling and data ingestion

pub mod clock;
pub mod distance_table;
pub mod init_hub;
pub mod package_table;
