pub mod harvest;
pub mod http;
pub mod lyrics;
pub mod normalize;
pub mod output;

pub use http::{HttpFetcher, Page, PageFetcher};
pub use lyrics::{FetchOutcome, SlugOverrides, SongLyrics};
