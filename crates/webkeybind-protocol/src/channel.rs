use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::{ChannelError, Request, Response};

/// Identifier of a browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fire a request at another context and await its response.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send `request` and wait for the reply.
    async fn request(&self, request: Request) -> Result<Response, ChannelError>;
}

/// Enumerate tabs and message the content script in one of them.
#[async_trait]
pub trait TabMessenger: Send + Sync {
    /// Every open tab.
    async fn tabs(&self) -> Result<Vec<TabId>, ChannelError>;

    /// Send `request` to the content script of `tab`.
    async fn send(&self, tab: TabId, request: Request) -> Result<Response, ChannelError>;
}

/// The reply half of an [`Incoming`] request. Consumed by answering.
#[derive(Debug)]
pub struct Responder {
    /// Reply slot.
    tx: oneshot::Sender<Response>,
}

impl Responder {
    /// Pair a responder with the receiver its answer arrives on.
    pub fn pair() -> (Self, oneshot::Receiver<Response>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Answer with `response`.
    pub fn resolve(self, response: Response) {
        if self.tx.send(response).is_err() {
            debug!("requester went away before the response");
        }
    }

    /// Answer with `{success: false, error}`.
    pub fn reject(self, error: impl fmt::Display) {
        self.resolve(Response::failure(error));
    }
}

/// A request that is answered later through its responder.
#[derive(Debug)]
pub struct Incoming {
    /// The request.
    pub request: Request,
    /// Where the answer goes.
    pub responder: Responder,
}

/// In-process [`Channel`] backed by a tokio mpsc queue of [`Incoming`].
#[derive(Debug, Clone)]
pub struct LocalChannel {
    /// Queue into the receiving context.
    tx: mpsc::Sender<Incoming>,
}

impl LocalChannel {
    /// A channel and the receiver the serving side drains.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Incoming>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Channel for LocalChannel {
    async fn request(&self, request: Request) -> Result<Response, ChannelError> {
        let (responder, rx) = Responder::pair();
        self.tx
            .send(Incoming { request, responder })
            .await
            .map_err(|_| ChannelError::Closed)?;
        rx.await.map_err(|_| ChannelError::NoResponse)
    }
}
