// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Relay-backed transport implementation.
//!
//! `RelayWorker` speaks the frame protocol over an established stream
//! socket. It carries no retry or reconnect logic: the supervisor owns
//! the worker lifecycle and restarts the process if the relay goes away.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tracing::{debug, info};

use crate::config::{RelayEndpoint, WorkerConfig};
use crate::envelope::{ErrorEnvelope, Request, Response};
use crate::frame::{Frame, FrameError, FramedStream, MessageType};
use crate::transport::{Transport, TransportError, WaitOutcome};

/// Stream type the relay connection is erased to after connect.
pub trait RelayStream: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> RelayStream for T {}

/// A boxed relay stream, as produced by [`RelayWorker::connect`].
pub type BoxedStream = Box<dyn RelayStream>;

/// Worker end of a relay connection.
pub struct RelayWorker<S> {
    stream: FramedStream<S>,
}

impl RelayWorker<BoxedStream> {
    /// Connect to the relay endpoint named by the configuration.
    pub async fn connect(config: &WorkerConfig) -> Result<Self, TransportError> {
        let timeout = Duration::from_millis(config.connect_timeout_ms);
        let stream: BoxedStream = match &config.relay {
            RelayEndpoint::Tcp(addr) => {
                let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
                    .await
                    .map_err(|_| TransportError::ConnectTimeout(timeout))?
                    .map_err(TransportError::Connect)?;
                Box::new(stream)
            }
            #[cfg(unix)]
            RelayEndpoint::Unix(path) => {
                let stream = tokio::time::timeout(timeout, UnixStream::connect(path))
                    .await
                    .map_err(|_| TransportError::ConnectTimeout(timeout))?
                    .map_err(TransportError::Connect)?;
                Box::new(stream)
            }
        };

        info!(relay = %config.relay, "connected to relay");
        Ok(Self::new(stream))
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin + Send> RelayWorker<S> {
    /// Wrap an already-established stream.
    pub fn new(stream: S) -> Self {
        Self {
            stream: FramedStream::new(stream),
        }
    }
}

#[async_trait]
impl<S: AsyncRead + AsyncWrite + Unpin + Send> Transport for RelayWorker<S> {
    async fn wait_request(&mut self) -> WaitOutcome {
        let frame = match self.stream.read_frame().await {
            Ok(frame) => frame,
            Err(FrameError::ConnectionClosed) => {
                debug!("relay closed the stream");
                return WaitOutcome::Closed;
            }
            Err(err) => return WaitOutcome::Failed(err.into()),
        };

        match frame.message_type {
            MessageType::Stop => {
                debug!("stop frame received");
                WaitOutcome::Closed
            }
            MessageType::Request => match serde_json::from_slice::<Request>(&frame.payload) {
                Ok(request) => WaitOutcome::Request(request),
                Err(err) => WaitOutcome::Failed(TransportError::Envelope(err)),
            },
            MessageType::Error => {
                let message = serde_json::from_slice::<ErrorEnvelope>(&frame.payload)
                    .map(|envelope| envelope.message)
                    .unwrap_or_else(|_| String::from_utf8_lossy(&frame.payload).into_owned());
                WaitOutcome::Failed(TransportError::Relay(message))
            }
            other => WaitOutcome::Failed(TransportError::Unexpected(other)),
        }
    }

    async fn respond(&mut self, response: &Response) -> Result<(), TransportError> {
        let frame = Frame::response(response)?;
        self.stream.write_frame(&frame).await?;
        Ok(())
    }
}
