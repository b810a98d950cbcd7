//! # Config Commands
//!
//! Host commands for retrieving configuration.

use tracing::debug;

use crate::state::ConfigState;

/// Gets the current host configuration.
///
/// ## When Used
/// - Startup (currency symbol, whether AI import is available)
/// - Settle-up screen (payee for the payment QR code)
///
/// The import API key is never part of the serialized result.
pub fn get_config(config: &ConfigState) -> ConfigState {
    debug!("get_config command");
    config.clone()
}
