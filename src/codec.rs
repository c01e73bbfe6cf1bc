//! Message-level encode/decode against a [`MessageCatalog`].
//!
//! Encoding lays fields out at cumulative offsets in declaration order
//! (little-endian, no padding) and wraps the payload in the wire frame from
//! [`frame`](crate::frame). Decoding unpacks a frame payload back into typed
//! [`Value`]s at the same offsets.

use crate::frame::{self, FrameError};
use crate::schema::{FieldType, Message, MessageCatalog};
use crate::value::Value;
use byteorder::{ByteOrder, LittleEndian};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unknown message: {0}")]
    UnknownMessage(String),
    #[error("message {msg}: expected {expected} values, got {got}")]
    ArityMismatch {
        msg: String,
        expected: usize,
        got: usize,
    },
    #[error("message {msg}, field {field}: expected {expected}, got a {got} value")]
    TypeMismatch {
        msg: String,
        field: String,
        expected: &'static str,
        got: &'static str,
    },
    #[error("message {msg}: payload of {got} bytes, layout needs {expected}")]
    PayloadSizeMismatch {
        msg: String,
        expected: usize,
        got: usize,
    },
    #[error("message {0} is not request-class (ID >= 200)")]
    NotARequest(String),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Encoder/decoder for every message in one catalog.
#[derive(Debug)]
pub struct MessageCodec {
    catalog: MessageCatalog,
}

impl MessageCodec {
    pub fn new(catalog: MessageCatalog) -> Self {
        MessageCodec { catalog }
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Encode a complete frame for `name` from field values in declaration
    /// order. Arity and per-field types are checked before any byte is
    /// written.
    pub fn encode(&self, name: &str, values: &[Value]) -> Result<Vec<u8>, CodecError> {
        let msg = self.lookup(name)?;
        let payload = encode_payload(msg, values)?;
        Ok(frame::encode_frame(msg.id, &payload)?)
    }

    /// Encode the zero-argument request frame for a request-class message.
    pub fn encode_request(&self, name: &str) -> Result<[u8; 7], CodecError> {
        let msg = self.lookup(name)?;
        if !msg.is_request() {
            return Err(CodecError::NotARequest(msg.name.clone()));
        }
        Ok(frame::encode_request(msg.id))
    }

    /// Decode a frame payload for `name` into typed values, one per field,
    /// in declaration order.
    pub fn decode_payload(&self, name: &str, payload: &[u8]) -> Result<Vec<Value>, CodecError> {
        let msg = self.lookup(name)?;
        decode_payload(msg, payload)
    }

    fn lookup(&self, name: &str) -> Result<&Message, CodecError> {
        self.catalog
            .get(name)
            .ok_or_else(|| CodecError::UnknownMessage(name.to_string()))
    }
}

/// Encode the payload bytes for one message (no framing).
pub fn encode_payload(msg: &Message, values: &[Value]) -> Result<Vec<u8>, CodecError> {
    if values.len() != msg.fields.len() {
        return Err(CodecError::ArityMismatch {
            msg: msg.name.clone(),
            expected: msg.fields.len(),
            got: values.len(),
        });
    }
    let mut out = Vec::with_capacity(msg.payload_size());
    for (field, value) in msg.fields.iter().zip(values) {
        if value.field_type() != field.ty {
            return Err(CodecError::TypeMismatch {
                msg: msg.name.clone(),
                field: field.name.clone(),
                expected: field.ty.tag(),
                got: value.field_type().tag(),
            });
        }
        write_value(&mut out, value);
    }
    Ok(out)
}

/// Decode one message's payload at cumulative field offsets. The payload must
/// be exactly the layout size.
pub fn decode_payload(msg: &Message, payload: &[u8]) -> Result<Vec<Value>, CodecError> {
    let expected = msg.payload_size();
    if payload.len() != expected {
        return Err(CodecError::PayloadSizeMismatch {
            msg: msg.name.clone(),
            expected,
            got: payload.len(),
        });
    }
    let mut out = Vec::with_capacity(msg.fields.len());
    let mut pos = 0;
    for field in &msg.fields {
        out.push(read_value(field.ty, &payload[pos..]));
        pos += field.ty.wire_size();
    }
    Ok(out)
}

fn write_value(out: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Byte(x) => out.push(*x),
        Value::Short(x) => {
            let mut buf = [0u8; 2];
            LittleEndian::write_i16(&mut buf, *x);
            out.extend_from_slice(&buf);
        }
        Value::Float(x) => {
            let mut buf = [0u8; 4];
            LittleEndian::write_f32(&mut buf, *x);
            out.extend_from_slice(&buf);
        }
        Value::Int(x) => {
            let mut buf = [0u8; 4];
            LittleEndian::write_i32(&mut buf, *x);
            out.extend_from_slice(&buf);
        }
    }
}

fn read_value(ty: FieldType, bytes: &[u8]) -> Value {
    match ty {
        FieldType::Byte => Value::Byte(bytes[0]),
        FieldType::Short => Value::Short(LittleEndian::read_i16(bytes)),
        FieldType::Float => Value::Float(LittleEndian::read_f32(bytes)),
        FieldType::Int => Value::Int(LittleEndian::read_i32(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MessageCatalog;

    fn codec() -> MessageCodec {
        let src = r#"{
            "MIXED": [
                {"ID": "201"},
                {"flags": "byte"},
                {"temp": "short"},
                {"alt": "int"}
            ],
            "ATTITUDE_RADIANS": [
                {"ID": "122"},
                {"roll": "float"},
                {"pitch": "float"},
                {"yaw": "float"}
            ]
        }"#;
        MessageCodec::new(MessageCatalog::from_json(src).expect("load"))
    }

    #[test]
    fn offsets_for_1_2_4_are_0_1_3() {
        let codec = codec();
        let msg = codec.catalog().get("MIXED").expect("message");
        assert_eq!(msg.field_offsets(), [0, 1, 3]);
        assert_eq!(msg.payload_size(), 7);
    }

    #[test]
    fn encode_layout_is_little_endian_and_unpadded() {
        let codec = codec();
        let bytes = codec
            .encode(
                "MIXED",
                &[Value::Byte(0xab), Value::Short(-2), Value::Int(0x01020304)],
            )
            .expect("encode");
        // '$' 'M' '>' len id payload ck
        assert_eq!(&bytes[..5], &[0x24, 0x4d, 0x3e, 7, 201]);
        assert_eq!(&bytes[5..12], &[0xab, 0xfe, 0xff, 0x04, 0x03, 0x02, 0x01]);
        assert_eq!(bytes.len(), 13);
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let codec = codec();
        let values = [
            Value::Float(-0.0),
            Value::Float(f32::MIN_POSITIVE),
            Value::Float(1234.5678),
        ];
        let bytes = codec.encode("ATTITUDE_RADIANS", &values).expect("encode");
        let payload = &bytes[5..bytes.len() - 1];
        let decoded = codec
            .decode_payload("ATTITUDE_RADIANS", payload)
            .expect("decode");
        for (orig, back) in values.iter().zip(&decoded) {
            assert_eq!(
                orig.as_float().unwrap().to_bits(),
                back.as_float().unwrap().to_bits()
            );
        }
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let codec = codec();
        let err = codec
            .encode(
                "MIXED",
                &[Value::Byte(1), Value::Int(2), Value::Int(3)],
            )
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    #[test]
    fn short_payload_is_rejected() {
        let codec = codec();
        let err = codec.decode_payload("MIXED", &[0u8; 6]).unwrap_err();
        assert!(matches!(err, CodecError::PayloadSizeMismatch { .. }));
    }

    #[test]
    fn request_encoder_rejects_state_messages() {
        let codec = codec();
        assert!(codec.encode_request("ATTITUDE_RADIANS").is_ok());
        assert!(matches!(
            codec.encode_request("MIXED"),
            Err(CodecError::NotARequest(_))
        ));
    }
}
