//! Per-connection worker
//!
//! Each accepted connection runs one worker task: receive into a growable
//! buffer, slice off every newline-terminated record, hand it to the shared
//! log, and echo the log contents back after each record that was not a seek
//! directive. The worker owns its socket and releases it on every exit path.

use crate::config::ServerSettings;
use crate::log::SharedLog;
use crate::Result;
use memchr::memchr;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tracing::{error, info};

/// State machine for one client connection.
pub struct ConnectionWorker {
    stream: TcpStream,
    peer: SocketAddr,
    log: Arc<SharedLog>,
    read_size: usize,
    write_size: usize,
    /// Absolute offset the next echo starts from. 0 unless a seek directive
    /// repositioned it; rewound to 0 after every echo.
    cursor: u64,
    shutdown_rx: broadcast::Receiver<()>,
}

impl ConnectionWorker {
    /// Wrap an accepted connection.
    pub fn new(
        stream: TcpStream,
        peer: SocketAddr,
        log: Arc<SharedLog>,
        settings: &ServerSettings,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            stream,
            peer,
            log,
            read_size: settings.read_size,
            write_size: settings.write_size,
            cursor: 0,
            shutdown_rx,
        }
    }

    /// Serve the connection until the peer closes, an error occurs, or
    /// shutdown is requested. Consumes the worker; the socket closes when it
    /// is dropped here.
    pub async fn run(mut self) {
        info!(peer = %self.peer, "Accepted connection");
        if let Err(e) = self.serve().await {
            error!(peer = %self.peer, error = %e, "connection failed");
        }
        info!(peer = %self.peer, "Closed connection");
    }

    async fn serve(&mut self) -> Result<()> {
        let mut buf = vec![0u8; self.read_size];
        let mut filled = 0usize;

        loop {
            if filled == buf.len() {
                let grown = buf.len() + self.read_size;
                buf.resize(grown, 0);
            }

            let received = tokio::select! {
                result = self.stream.read(&mut buf[filled..]) => result?,
                _ = self.shutdown_rx.recv() => return Ok(()),
            };
            if received == 0 {
                // Orderly close from the peer.
                return Ok(());
            }
            filled += received;

            // Slice off every complete record, oldest first, compacting the
            // buffer after each one.
            while let Some(newline) = memchr(b'\n', &buf[..filled]) {
                let report = self.log.append(&buf[..=newline], &mut self.cursor);
                buf.copy_within(newline + 1..filled, 0);
                filled -= newline + 1;

                if report.appended > 0 {
                    self.echo().await?;
                }
            }
        }
    }

    /// Send the log contents from the current cursor, one frame at a time,
    /// then rewind the cursor so the next echo covers the whole log unless a
    /// seek directive intervenes. The snapshot is copied out of the log
    /// before any socket write, so the frames form one consistent prefix.
    async fn echo(&mut self) -> Result<()> {
        let snapshot = self.log.snapshot_from(self.cursor);
        self.cursor = 0;
        for frame in snapshot.chunks(self.write_size) {
            self.stream.write_all(frame).await?;
        }
        Ok(())
    }
}
