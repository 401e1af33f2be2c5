pub mod fetcher;
pub mod http;
pub mod observer;
pub mod pool;

pub use fetcher::{FetchError, Fetcher};
pub use http::HttpFetcher;
pub use observer::{LogObserver, NoopObserver, ScanObserver};
pub use pool::fetch_all;
