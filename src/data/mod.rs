//! Data acquisition: CSV parsing plus the remote fallback fetch.

pub mod loader;
pub mod remote;

pub use loader::{LoadedCsv, RowError, read_sales_csv, read_sales_csv_path};
pub use remote::{FALLBACK_URL, RemoteCsv};
