//! Data module - CSV loading and typed records

mod loader;
mod record;

pub use loader::{DataLoader, LoaderError};
pub use record::{parse_value, Header, Record, Value};
