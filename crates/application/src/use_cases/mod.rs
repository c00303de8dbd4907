pub mod context;
pub mod query_result;

pub use context::{ContextBuilder, ResolutionContext};
pub use query_result::QueryResult;
