//! Listener binding with the default-port fallback.

use std::net::Ipv4Addr;

use tokio::net::TcpListener;
use tracing::warn;

use crate::config::PortRequest;
use crate::error::Error;

/// Address the server listens on.
pub const HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

/// Bind a listener and return it with the port it actually got.
///
/// An explicit port is bound exactly or fails. Otherwise `default_port` is
/// tried first and the OS picks a free port if that fails.
pub async fn bind(request: PortRequest, default_port: u16) -> Result<(TcpListener, u16), Error> {
    let listener = match request {
        PortRequest::Explicit(port) => TcpListener::bind((HOST, port))
            .await
            .map_err(|source| Error::PortUnavailable { port, source })?,
        PortRequest::Fallback => match TcpListener::bind((HOST, default_port)).await {
            Ok(listener) => listener,
            Err(e) => {
                warn!(port = default_port, error = %e, "Default port unavailable, using a free port");
                TcpListener::bind((HOST, 0)).await?
            }
        },
    };

    let port = listener.local_addr()?.port();
    Ok((listener, port))
}
