pub mod cache;
pub mod retrieval;

pub use cache::{canonicalize, SignalCache};
pub use retrieval::{HttpRetriever, Retrieve};
