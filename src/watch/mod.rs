pub mod price_cache;
pub mod rules;
pub mod state;

pub use price_cache::{percent_change, PriceCache};
pub use rules::WatchRules;
pub use state::{IngestOutcome, WatchState};
