pub mod route;
pub mod transaction;

pub use route::*;
pub use transaction::*;
