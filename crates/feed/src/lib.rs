pub mod csv_source;
pub mod fetch;
pub mod normalize;
pub mod yahoo;

pub use csv_source::CsvSource;
pub use fetch::{fetch_series, FetchSettings};
pub use normalize::normalize;
pub use yahoo::YahooSource;
