pub mod price_client;
pub mod transaction_client;
pub mod types;

pub use price_client::{PriceClient, PriceClientError};
pub use transaction_client::{FeedClientError, TransactionClient};
pub use types::{ApiParty, ApiTransaction, ApiTransactionsResponse, Owner, OwnerType};
