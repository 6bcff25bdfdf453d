//! Settings for the catalog: identifier secret, range limits and the list of
//! storage backends.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::{Settings, StorageSettings};
