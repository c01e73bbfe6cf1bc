//! Message catalog: schema model and JSON loading.
//!
//! A schema is a JSON object mapping message names to field lists:
//!
//! ```json
//! {
//!   "RC_NORMAL": [
//!     {"ID": "121"},
//!     {"c1": "float"},
//!     {"c2": "float"},
//!     {"comment": "scaled channel values"}
//!   ]
//! }
//! ```
//!
//! The `"ID"` pseudo-field is mandatory exactly once per message. A field named
//! `comment` (any case) is an annotation: it occupies no payload bytes and is
//! excluded from generated handler signatures. All validation (missing or
//! duplicate IDs, duplicate names, unknown type tags) happens at load time so
//! generation never starts from a broken catalog.

use serde_json::Value as Json;
use std::collections::HashMap;

/// Wire type of a message field. Sizes are fixed and known at load time;
/// multi-byte types are little-endian on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// 1 byte, unsigned.
    Byte,
    /// 2 bytes, signed.
    Short,
    /// 4 bytes, IEEE-754 single.
    Float,
    /// 4 bytes, signed.
    Int,
}

impl FieldType {
    /// Parse a schema type tag (`byte`, `short`, `float`, `int`).
    pub fn from_tag(tag: &str) -> Option<FieldType> {
        match tag {
            "byte" => Some(FieldType::Byte),
            "short" => Some(FieldType::Short),
            "float" => Some(FieldType::Float),
            "int" => Some(FieldType::Int),
            _ => None,
        }
    }

    /// Schema tag for this type.
    pub fn tag(self) -> &'static str {
        match self {
            FieldType::Byte => "byte",
            FieldType::Short => "short",
            FieldType::Float => "float",
            FieldType::Int => "int",
        }
    }

    /// Size in payload bytes.
    pub fn wire_size(self) -> usize {
        match self {
            FieldType::Byte => 1,
            FieldType::Short => 2,
            FieldType::Float => 4,
            FieldType::Int => 4,
        }
    }

    /// Numeric pack-format code (struct-style): `B`, `h`, `f`, `i`.
    pub fn pack_code(self) -> char {
        match self {
            FieldType::Byte => 'B',
            FieldType::Short => 'h',
            FieldType::Float => 'f',
            FieldType::Int => 'i',
        }
    }
}

/// A single data-bearing field. Declaration order determines the payload offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}

/// One message type: wire ID plus ordered fields (comment annotations already
/// stripped).
#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    pub id: u8,
    pub fields: Vec<Field>,
}

impl Message {
    /// Request-class messages (ID < 200) are queries to the controller; the
    /// reply reuses the same ID and carries the fields. IDs >= 200 are
    /// one-directional state messages.
    pub fn is_request(&self) -> bool {
        self.id < crate::frame::STATE_ID_FLOOR
    }

    /// Total payload size in bytes (sum of field wire sizes).
    pub fn payload_size(&self) -> usize {
        self.fields.iter().map(|f| f.ty.wire_size()).sum()
    }

    /// Cumulative byte offset of each field within the payload.
    /// Fields of sizes [1, 2, 4] sit at offsets [0, 1, 3].
    pub fn field_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.fields.len());
        let mut pos = 0;
        for f in &self.fields {
            offsets.push(pos);
            pos += f.ty.wire_size();
        }
        offsets
    }

    /// If every field shares one type, return it. `None` for mixed-type
    /// messages (and for empty field lists).
    pub fn uniform_field_type(&self) -> Option<FieldType> {
        let first = self.fields.first()?.ty;
        self.fields.iter().all(|f| f.ty == first).then_some(first)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema root must be an object of message definitions")]
    NotAnObject,
    #[error("message {0}: definition must be an array of single-key objects")]
    BadShape(String),
    #[error("message {0}: missing ID")]
    MissingId(String),
    #[error("message {0}: more than one ID entry")]
    DuplicateIdEntry(String),
    #[error("message {0}: ID {1:?} is not an integer in [0, 255]")]
    BadId(String, String),
    #[error("messages {0} and {1} share ID {2}")]
    DuplicateId(String, String, u8),
    #[error("duplicate message name: {0}")]
    DuplicateName(String),
    #[error("message {msg}: duplicate field name: {field}")]
    DuplicateField { msg: String, field: String },
    #[error("message {msg}, field {field}: unknown type tag {tag:?}")]
    UnknownType {
        msg: String,
        field: String,
        tag: String,
    },
}

/// Immutable, order-preserving catalog of messages. Built once from schema
/// input; generation and dispatch iterate it in declaration order.
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    messages: Vec<Message>,
    by_name: HashMap<String, usize>,
    by_id: HashMap<u8, usize>,
}

impl MessageCatalog {
    /// Parse and validate a JSON schema string.
    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        let root: Json = serde_json::from_str(source)?;
        Self::from_value(&root)
    }

    /// Build a catalog from an already-parsed JSON document.
    pub fn from_value(root: &Json) -> Result<Self, SchemaError> {
        let obj = root.as_object().ok_or(SchemaError::NotAnObject)?;
        let mut messages = Vec::with_capacity(obj.len());
        for (name, body) in obj {
            messages.push(parse_message(name, body)?);
        }
        Self::from_messages(messages)
    }

    /// Build a catalog from pre-constructed messages, enforcing name and ID
    /// uniqueness.
    pub fn from_messages(messages: Vec<Message>) -> Result<Self, SchemaError> {
        let mut by_name = HashMap::new();
        let mut by_id: HashMap<u8, usize> = HashMap::new();
        for (i, m) in messages.iter().enumerate() {
            if by_name.insert(m.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateName(m.name.clone()));
            }
            if let Some(&prev) = by_id.get(&m.id) {
                return Err(SchemaError::DuplicateId(
                    messages[prev].name.clone(),
                    m.name.clone(),
                    m.id,
                ));
            }
            by_id.insert(m.id, i);
        }
        Ok(MessageCatalog {
            messages,
            by_name,
            by_id,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Message> {
        self.by_name.get(name).map(|&i| &self.messages[i])
    }

    pub fn get_by_id(&self, id: u8) -> Option<&Message> {
        self.by_id.get(&id).map(|&i| &self.messages[i])
    }

    /// Messages in schema declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn parse_message(name: &str, body: &Json) -> Result<Message, SchemaError> {
    let entries = body
        .as_array()
        .ok_or_else(|| SchemaError::BadShape(name.to_string()))?;
    let mut id: Option<u8> = None;
    let mut fields: Vec<Field> = Vec::new();
    for entry in entries {
        let obj = entry
            .as_object()
            .ok_or_else(|| SchemaError::BadShape(name.to_string()))?;
        let mut kv = obj.iter();
        let (key, value) = match (kv.next(), kv.next()) {
            (Some(first), None) => first,
            _ => return Err(SchemaError::BadShape(name.to_string())),
        };
        if key == "ID" {
            if id.is_some() {
                return Err(SchemaError::DuplicateIdEntry(name.to_string()));
            }
            id = Some(parse_id(name, value)?);
            continue;
        }
        if key.eq_ignore_ascii_case("comment") {
            // Annotation: no wire bytes, no handler argument.
            continue;
        }
        let tag = value
            .as_str()
            .ok_or_else(|| SchemaError::BadShape(name.to_string()))?;
        let ty = FieldType::from_tag(tag).ok_or_else(|| SchemaError::UnknownType {
            msg: name.to_string(),
            field: key.clone(),
            tag: tag.to_string(),
        })?;
        if fields.iter().any(|f| f.name == *key) {
            return Err(SchemaError::DuplicateField {
                msg: name.to_string(),
                field: key.clone(),
            });
        }
        fields.push(Field {
            name: key.clone(),
            ty,
        });
    }
    let id = id.ok_or_else(|| SchemaError::MissingId(name.to_string()))?;
    Ok(Message {
        name: name.to_string(),
        id,
        fields,
    })
}

/// The ID value is conventionally a JSON string ("121"); bare integers are
/// accepted too.
fn parse_id(name: &str, value: &Json) -> Result<u8, SchemaError> {
    let bad = || SchemaError::BadId(name.to_string(), value.to_string());
    match value {
        Json::String(s) => s.trim().parse::<u8>().map_err(|_| bad()),
        Json::Number(n) => n
            .as_u64()
            .and_then(|v| u8::try_from(v).ok())
            .ok_or_else(bad),
        _ => Err(bad()),
    }
}
