//! ringlog server implementation

pub mod connection;
pub mod tcp;
#[cfg(feature = "timestamps")]
pub mod timestamp;

use crate::config::ServerConfig;
use crate::log::SharedLog;
use crate::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{error, info};

pub use connection::ConnectionWorker;
#[cfg(feature = "timestamps")]
pub use timestamp::TimestampEmitter;

/// Handle for requesting a graceful shutdown from outside the server task.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: broadcast::Sender<()>,
}

impl ShutdownHandle {
    /// Stop accepting, drain the workers, and let `start` return.
    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }
}

/// The accumulator server: listener, shared log, and worker supervision.
pub struct AccumulatorServer {
    config: ServerConfig,
    listener: std::net::TcpListener,
    log: Arc<SharedLog>,
    shutdown_tx: broadcast::Sender<()>,
}

impl AccumulatorServer {
    /// Validate the configuration and bind the listening socket.
    ///
    /// Binding happens here, synchronously and before any runtime exists, so
    /// the caller can fork into daemon mode afterwards while bind errors
    /// still surface as a non-zero exit.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        config.validate()?;
        let listener = tcp::bind_listener(&config.server)?;
        let log = Arc::new(SharedLog::new(config.log.ring_capacity));
        let (shutdown_tx, _) = broadcast::channel(1);

        Ok(Self {
            config,
            listener,
            log,
            shutdown_tx,
        })
    }

    /// The address the listener actually bound, useful when port 0 was
    /// requested.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(Into::into)
    }

    /// Handle that triggers a graceful shutdown of a running server.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run the accept loop until shutdown.
    ///
    /// One worker task per accepted connection; finished workers are reaped
    /// between accepts. On shutdown the listener is dropped first, then
    /// every remaining worker is awaited before this returns.
    pub async fn start(self) -> Result<()> {
        self.listener.set_nonblocking(true)?;
        let listener = tokio::net::TcpListener::from_std(self.listener)?;

        #[cfg(feature = "timestamps")]
        let emitter_task = {
            let emitter = TimestampEmitter::new(Arc::clone(&self.log), &self.config.timestamps);
            let shutdown_rx = self.shutdown_tx.subscribe();
            tokio::spawn(async move { emitter.start_task(shutdown_rx).await })
        };

        let mut workers: JoinSet<()> = JoinSet::new();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let worker = ConnectionWorker::new(
                                stream,
                                peer,
                                Arc::clone(&self.log),
                                &self.config.server,
                                self.shutdown_tx.subscribe(),
                            );
                            workers.spawn(worker.run());
                        }
                        Err(e) => {
                            error!(error = %e, "accept failed, shutting down");
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("shutdown requested");
                    break;
                }
            }

            // Reap workers whose connections have already finished.
            while workers.try_join_next().is_some() {}
        }

        // Stop accepting before draining so no new work arrives.
        drop(listener);
        let _ = self.shutdown_tx.send(());
        while workers.join_next().await.is_some() {}

        #[cfg(feature = "timestamps")]
        let _ = emitter_task.await;

        info!("server stopped");
        Ok(())
    }
}
