mod connection_string;
mod error;

pub use connection_string::ConnectionString;
pub use error::{Error, Result};
