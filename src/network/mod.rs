//! Cache-aware HTTP fetching
//!
//! - `HttpFetcher`: the pipeline callers use
//! - `Transport`: HTTP client seam, `ReqwestTransport` in production
//! - `ConnectivityProbe`: "is there a network?" seam
//! - `HttpResult`: result object carrying content, cache and status metadata

pub mod connectivity;
pub mod error;
pub mod fetcher;
pub mod result;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use connectivity::{
    AlwaysOnline, ConnectivityProbe, ManualConnectivity, StatusCallback, TcpConnectivityProbe,
};
pub use error::{FetchError, TransportError};
pub use fetcher::HttpFetcher;
pub use result::HttpResult;
pub use transport::{ReqwestTransport, Transport, TransportResponse, DEFAULT_TIMEOUT};
