//! Analytics collector clients.

mod umami;

pub use umami::{DEFAULT_ENDPOINT, UmamiClient, UmamiConfig};
