pub mod money;
pub mod period;
pub mod transaction;

pub use money::Money;
pub use period::DateRange;
pub use transaction::{ImportedTransaction, NormalizedTransaction, TransactionId, TransactionKind};
