//! Response types for HTTP handlers.

mod documents;
mod errors;
mod monitors;

pub use documents::*;
pub use errors::*;
pub use monitors::*;
