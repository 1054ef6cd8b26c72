//! Message protocol between the background service, content scripts and
//! management surfaces.
//!
//! Every message is a JSON object tagged by `action`; every reply is a
//! [`Response`] with `success` plus an optional `error` or payload. The
//! "reply later" pattern is modelled by [`Incoming`], which pairs a request
//! with a one-shot [`Responder`].

mod action;
mod channel;
mod error;
mod message;
mod notice;

pub use action::Action;
pub use channel::{Channel, Incoming, LocalChannel, Responder, TabId, TabMessenger};
pub use error::{ChannelError, ProtocolError};
pub use message::{Request, Response, SelectionData};
pub use notice::{Notice, NotifyKind};
