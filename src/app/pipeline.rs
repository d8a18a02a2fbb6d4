//! Dataset loading pipeline shared by the CLI report and the TUI.
//!
//! The dataset is read once at startup and is immutable afterwards; every
//! later interaction only re-runs the (pure) chart assembler against it.

use crate::cli::DataArgs;
use crate::data::{LoadedCsv, RemoteCsv, read_sales_csv, read_sales_csv_path};
use crate::error::AppError;

/// Where the dataset actually came from.
#[derive(Debug, Clone)]
pub enum DataSource {
    LocalFile(std::path::PathBuf),
    RemoteUrl(String),
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::LocalFile(path) => write!(f, "{}", path.display()),
            DataSource::RemoteUrl(url) => write!(f, "{url}"),
        }
    }
}

/// Load result: parsed CSV plus provenance.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub loaded: LoadedCsv,
    pub source: DataSource,
}

/// Load the dataset: local CSV first, remote fallback second.
///
/// Only the failure of both paths is fatal.
pub fn load_dataset(args: &DataArgs) -> Result<LoadOutcome, AppError> {
    load_dataset_with(args, || RemoteCsv::new(&args.url).fetch())
}

/// Same as `load_dataset`, with the remote fetch injected so the fallback
/// ordering is testable without real HTTP.
fn load_dataset_with(
    args: &DataArgs,
    fetch: impl FnOnce() -> Result<String, AppError>,
) -> Result<LoadOutcome, AppError> {
    let local_err = match read_sales_csv_path(&args.data) {
        Ok(loaded) => {
            return Ok(LoadOutcome {
                loaded,
                source: DataSource::LocalFile(args.data.clone()),
            });
        }
        Err(err) => err,
    };

    let body = fetch().map_err(|remote_err| {
        AppError::new(
            remote_err.exit_code(),
            format!("{local_err}; fallback failed: {remote_err}"),
        )
    })?;

    let loaded = read_sales_csv(body.as_bytes())?;
    Ok(LoadOutcome {
        loaded,
        source: DataSource::RemoteUrl(args.url.clone()),
    })
}
