//! TCP listener setup for the HTTP server

use std::net::SocketAddr;
use std::time::Duration;

const SOCKET_BUFFER_SIZE: usize = 256 * 1024;
const LISTEN_BACKLOG: i32 = 65535;

/// Bind a tuned, non-blocking listener on `addr`
pub fn bind_listener(addr: &str) -> anyhow::Result<tokio::net::TcpListener> {
    let socket_addr: SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address '{}': {}", addr, e))?;

    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;

    #[cfg(target_os = "linux")]
    let keepalive = socket2::TcpKeepalive::new()
        .with_time(Duration::from_secs(60))
        .with_interval(Duration::from_secs(10))
        .with_retries(3);
    #[cfg(not(target_os = "linux"))]
    let keepalive = socket2::TcpKeepalive::new().with_time(Duration::from_secs(60));
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(LISTEN_BACKLOG)?;

    Ok(tokio::net::TcpListener::from_std(socket.into())?)
}
