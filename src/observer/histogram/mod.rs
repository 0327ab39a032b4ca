//! Histogram observer with non-linear range search
//!
//! Maintains a running histogram of observed values over a relaxed bin
//! range, then selects the clipping range that minimizes L2 quantization
//! error when mapped onto 256 destination bins:
//! - `observer`: online histogram accumulation and zero-inclusion padding
//! - `search`: two-pointer quantile search over the cumulative histogram
//! - `combine`: merge primitive for histograms with differing bin ranges

mod combine;
mod observer;
mod search;
mod types;


pub use combine::combine_histograms;
pub use observer::{HistogramObserver, DEFAULT_BINS};
pub use types::{NormType, SearchType};
