pub mod epoch;
mod source;
mod types;

pub use source::{decode_response, fetch_and_transform, StatsSource};
pub use types::{compare_names, DisplayDocument, Miner, StatusDocument};
