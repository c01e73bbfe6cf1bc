//! # mspgen — MultiWii-style serial protocol codec and parser generator
//!
//! A JSON message schema (name, wire ID, ordered typed fields) drives two
//! things:
//!
//! - a **direct codec**: encode/decode frames and dispatch them to typed
//!   handlers in-process, and
//! - a **generator**: emit interoperable serializer/dispatcher/handler-stub
//!   source for C++, Python, and Java targets.
//!
//! ## Wire format
//!
//! ```text
//! '$' 'M' <dir> <payload-length:1> <message-id:1> <payload ...> <checksum:1>
//! ```
//!
//! The checksum is an XOR fold over `[length, id, payload...]`. Message IDs
//! below 200 are request-class (query out, data-bearing reply back on the
//! same ID); 200 and above are one-directional state messages. See
//! [`frame`] for the exact rules — every emitted binding and the direct
//! codec share them, which is what makes the outputs wire-compatible.
//!
//! ## Example schema
//!
//! ```json
//! {
//!   "ATTITUDE": [
//!     {"ID": "108"},
//!     {"roll": "short"},
//!     {"pitch": "short"},
//!     {"yaw": "short"}
//!   ]
//! }
//! ```
//!
//! ## Usage
//!
//! See `tests/integration.rs` for codec examples and the `mspgen` binary for
//! code generation.

pub mod codec;
pub mod dispatch;
pub mod emit;
pub mod frame;
pub mod schema;
pub mod value;

pub use codec::{CodecError, MessageCodec};
pub use dispatch::{Dispatch, Dispatcher};
pub use emit::{generate, generate_all, write_artifacts, EmitError, GeneratedArtifact, Target, TargetProfile};
pub use frame::{checksum, encode_frame, encode_request, Frame, FrameDecoder, FrameError};
pub use schema::{Field, FieldType, Message, MessageCatalog, SchemaError};
pub use value::Value;
