//! Serve command implementation

use crate::config::Config;
use crate::error::Result;
use crate::server;

/// Run the HTTP server until interrupted
pub async fn cmd_serve(config: Config) -> Result<()> {
    server::serve(config).await
}
