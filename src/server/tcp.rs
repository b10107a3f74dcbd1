//! Listening socket setup
//!
//! The listener is created synchronously, before the tokio runtime exists,
//! so daemon mode can fork after bind and still surface bind errors to the
//! caller. Address-reuse is enabled on every candidate socket. Without an
//! explicit bind address the IPv6 wildcard is tried first, then the IPv4
//! wildcard; the first family that binds wins.

use crate::config::ServerSettings;
use crate::{Result, RingLogError};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener};
use tracing::{debug, info};

/// Bind a listening socket per the server settings.
pub fn bind_listener(settings: &ServerSettings) -> Result<TcpListener> {
    let candidates: Vec<SocketAddr> = match settings.bind_address {
        Some(addr) => vec![SocketAddr::new(addr, settings.port)],
        None => vec![
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), settings.port),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), settings.port),
        ],
    };

    let mut last_error = None;
    for addr in candidates {
        match try_bind(addr, settings.backlog) {
            Ok(listener) => {
                info!(address = %addr, "listening");
                return Ok(listener);
            }
            Err(e) => {
                debug!(address = %addr, error = %e, "bind candidate failed");
                last_error = Some(e);
            }
        }
    }

    Err(RingLogError::Server(format!(
        "unable to bind port {}: {}",
        settings.port,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

fn try_bind(addr: SocketAddr, backlog: i32) -> std::io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(backlog)?;
    Ok(socket.into())
}
