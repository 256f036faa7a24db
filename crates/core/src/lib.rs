pub mod catalog;
pub mod fetch;
pub mod headers;
pub mod record;
pub mod shape;
#[cfg(test)]
mod testutils;

pub use catalog::{CatalogError, MajorCatalog, MajorEntry, MajorLevel, ResolvedMajor};
pub use fetch::{FetchError, MajorFetcher, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use headers::{HeaderPool, HeaderPoolError, HeaderSet};
pub use record::{MajorDetail, RawMajorRecord, WORK_YEARS};
pub use shape::{render_json, render_markdown, shape, OutputFormat, UnknownFormat};
