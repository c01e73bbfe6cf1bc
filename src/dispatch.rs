//! Runtime dispatch: wire ID to decode-then-invoke, O(1) per frame.
//!
//! This is the direct-implementation counterpart of the dispatcher the
//! [emitters](crate::emit) generate for other languages: an incoming frame's
//! ID selects the message layout, the payload is decoded at cumulative
//! offsets, and the registered handler is called with the typed values.
//! A frame whose ID has no catalog entry (or no registered handler) is
//! dropped, never an error: the peer may speak message types this binding
//! does not implement.

use crate::codec::{self, CodecError};
use crate::frame::Frame;
use crate::schema::MessageCatalog;
use crate::value::Value;
use std::collections::HashMap;

/// Handler callback: receives the decoded field values in declaration order.
pub type Handler<'a> = Box<dyn FnMut(&[Value]) + 'a>;

/// Outcome of dispatching one frame.
#[derive(Debug, PartialEq)]
pub enum Dispatch {
    /// Decoded and handled.
    Handled,
    /// ID not in the catalog; frame dropped.
    UnknownId(u8),
    /// ID known but no handler registered; frame dropped.
    Unhandled(u8),
    /// Payload did not match the message layout; frame dropped.
    Malformed(u8),
}

/// ID-keyed dispatch table over one catalog.
pub struct Dispatcher<'a> {
    catalog: MessageCatalog,
    handlers: HashMap<u8, Handler<'a>>,
}

impl std::fmt::Debug for Dispatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("messages", &self.catalog.len())
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl<'a> Dispatcher<'a> {
    pub fn new(catalog: MessageCatalog) -> Self {
        Dispatcher {
            catalog,
            handlers: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Register the handler for a message by name. Replaces any previous
    /// handler. Returns the message's wire ID, or `None` if the name is not
    /// in the catalog.
    pub fn on<F>(&mut self, name: &str, handler: F) -> Option<u8>
    where
        F: FnMut(&[Value]) + 'a,
    {
        let id = self.catalog.get(name)?.id;
        self.handlers.insert(id, Box::new(handler));
        Some(id)
    }

    /// Route one checksum-verified frame: look up its ID, decode the payload
    /// at the message's field offsets, invoke the handler.
    pub fn dispatch(&mut self, frame: &Frame) -> Dispatch {
        let Some(msg) = self.catalog.get_by_id(frame.id) else {
            tracing::trace!(id = frame.id, "dropping frame with unknown message ID");
            return Dispatch::UnknownId(frame.id);
        };
        let values = match codec::decode_payload(msg, &frame.payload) {
            Ok(v) => v,
            Err(CodecError::PayloadSizeMismatch { expected, got, .. }) => {
                tracing::warn!(
                    id = frame.id,
                    expected,
                    got,
                    "dropping frame with wrong payload size"
                );
                return Dispatch::Malformed(frame.id);
            }
            Err(e) => {
                tracing::warn!(id = frame.id, error = %e, "dropping undecodable frame");
                return Dispatch::Malformed(frame.id);
            }
        };
        match self.handlers.get_mut(&frame.id) {
            Some(handler) => {
                handler(&values);
                Dispatch::Handled
            }
            None => Dispatch::Unhandled(frame.id),
        }
    }
}
