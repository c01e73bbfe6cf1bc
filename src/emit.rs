//! Generator engine: walk a catalog and emit, per target language, the
//! serializers, dispatcher, and handler stubs that speak the wire format from
//! [`frame`](crate::frame).
//!
//! One engine, table-driven [`TargetProfile`]s — not one emitter class tree
//! per language. The profile carries the data that varies (type declaration
//! names, pack codes, output file name); the layout arithmetic (field
//! offsets, payload sizes, checksum domain) is computed once here and shared
//! by every target, so the emitted bindings interoperate byte-for-byte.
//!
//! Emission order is catalog declaration order, so identical input produces
//! identical output. All artifacts are produced in memory; nothing touches
//! disk until [`write_artifacts`] runs, so a generation failure leaves no
//! partial output behind.

use crate::frame::{DIR_FROM_CONTROLLER, DIR_TO_CONTROLLER, HDR_MAGIC, HDR_PREAMBLE};
use crate::schema::{FieldType, Message, MessageCatalog};
use std::io::Write as _;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error(
        "message {msg}: request-class reply fields must share one type (found {types}); \
         mixed-type replies are not generatable"
    )]
    MixedTypeReply { msg: String, types: String },
}

/// Target language selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Cpp,
    Python,
    Java,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Target::Cpp => "cpp",
            Target::Python => "python",
            Target::Java => "java",
        }
    }
}

/// Per-language generation tables. All behavioral variation between targets
/// lives in data here plus the three `emit_*` functions; there is no emitter
/// hierarchy.
#[derive(Debug, Clone)]
pub struct TargetProfile {
    pub target: Target,
    pub file_name: &'static str,
    /// Declaration names indexed byte/short/float/int.
    decls: [&'static str; 4],
}

fn ty_index(ty: FieldType) -> usize {
    match ty {
        FieldType::Byte => 0,
        FieldType::Short => 1,
        FieldType::Float => 2,
        FieldType::Int => 3,
    }
}

impl TargetProfile {
    pub fn cpp() -> Self {
        TargetProfile {
            target: Target::Cpp,
            file_name: "serialtask.hpp",
            decls: ["uint8_t", "int16_t", "float", "int32_t"],
        }
    }

    pub fn python() -> Self {
        TargetProfile {
            target: Target::Python,
            file_name: "myparser.py",
            decls: ["B", "h", "f", "i"],
        }
    }

    pub fn java() -> Self {
        TargetProfile {
            target: Target::Java,
            file_name: "MyParser.java",
            decls: ["byte", "short", "float", "int"],
        }
    }

    /// All built-in profiles, in the order artifacts are generated.
    pub fn all() -> Vec<TargetProfile> {
        vec![Self::cpp(), Self::python(), Self::java()]
    }

    pub fn by_name(name: &str) -> Option<TargetProfile> {
        match name {
            "cpp" | "c++" => Some(Self::cpp()),
            "python" | "py" => Some(Self::python()),
            "java" => Some(Self::java()),
            _ => None,
        }
    }

    fn decl(&self, ty: FieldType) -> &'static str {
        self.decls[ty_index(ty)]
    }
}

/// One generated source file, held in memory until all targets succeed.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub language: &'static str,
    pub file_name: String,
    pub source: String,
}

/// Line-oriented source accumulator: indentation is structural (push/pop),
/// never hand-counted spaces inside format strings.
#[derive(Debug)]
struct SourceWriter {
    unit: &'static str,
    depth: usize,
    out: String,
}

impl SourceWriter {
    fn new(unit: &'static str) -> Self {
        SourceWriter {
            unit,
            depth: 0,
            out: String::new(),
        }
    }

    fn line(&mut self, s: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push_str(self.unit);
        }
        self.out.push_str(s.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn push(&mut self) {
        self.depth += 1;
    }

    fn pop(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth = self.depth.saturating_sub(1);
    }

    fn finish(self) -> String {
        debug_assert_eq!(self.depth, 0);
        self.out
    }
}

/// Validate the catalog against generation-time constraints shared by every
/// target: a request-class message's reply path sends all fields with one
/// typed send call, so mixed field types cannot be emitted and must fail
/// here instead of silently taking the first field's type.
pub fn validate_for_generation(catalog: &MessageCatalog) -> Result<(), EmitError> {
    for msg in catalog.iter() {
        if msg.is_request() && !msg.fields.is_empty() && msg.uniform_field_type().is_none() {
            let mut types: Vec<&str> = msg.fields.iter().map(|f| f.ty.tag()).collect();
            types.dedup();
            return Err(EmitError::MixedTypeReply {
                msg: msg.name.clone(),
                types: types.join(", "),
            });
        }
    }
    Ok(())
}

/// Generate one target's artifact from the catalog.
pub fn generate(
    catalog: &MessageCatalog,
    profile: &TargetProfile,
) -> Result<GeneratedArtifact, EmitError> {
    validate_for_generation(catalog)?;
    tracing::debug!(
        target = profile.target.name(),
        messages = catalog.len(),
        "generating artifact"
    );
    let source = match profile.target {
        Target::Cpp => emit_cpp(catalog, profile),
        Target::Python => emit_python(catalog, profile),
        Target::Java => emit_java(catalog, profile),
    };
    Ok(GeneratedArtifact {
        language: profile.target.name(),
        file_name: profile.file_name.to_string(),
        source,
    })
}

/// Generate every requested target. Any failure aborts the whole run before
/// a single artifact exists.
pub fn generate_all(
    catalog: &MessageCatalog,
    profiles: &[TargetProfile],
) -> Result<Vec<GeneratedArtifact>, EmitError> {
    profiles.iter().map(|p| generate(catalog, p)).collect()
}

/// Write artifacts under `outdir/<language>/<file_name>`, creating
/// directories as needed. Call only with a fully generated artifact set.
pub fn write_artifacts(
    artifacts: &[GeneratedArtifact],
    outdir: &Path,
) -> std::io::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let dir = outdir.join(artifact.language);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(&artifact.file_name);
        let mut file = std::fs::File::create(&path)?;
        file.write_all(artifact.source.as_bytes())?;
        tracing::info!(path = %path.display(), "wrote artifact");
        written.push(path);
    }
    Ok(written)
}

// Layout helpers shared by every target ======================================

struct FieldSlot<'a> {
    name: &'a str,
    ty: FieldType,
    offset: usize,
}

fn slots(msg: &Message) -> Vec<FieldSlot<'_>> {
    msg.fields
        .iter()
        .zip(msg.field_offsets())
        .map(|(f, offset)| FieldSlot {
            name: &f.name,
            ty: f.ty,
            offset,
        })
        .collect()
}

/// `len + id + payload` — the byte count the emitted checksum call covers.
fn checksum_span(msg: &Message) -> usize {
    msg.payload_size() + 2
}

/// Total frame size: header(3) + len + id + payload + checksum.
fn frame_size(msg: &Message) -> usize {
    msg.payload_size() + 6
}

fn direction_literal(msg: &Message) -> u8 {
    if msg.is_request() {
        DIR_TO_CONTROLLER
    } else {
        DIR_FROM_CONTROLLER
    }
}

fn param_list(profile: &TargetProfile, msg: &Message, by_ref: bool) -> String {
    let amp = if by_ref { " &" } else { "" };
    msg.fields
        .iter()
        .map(|f| format!("{}{} {}", profile.decl(f.ty), amp, f.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn arg_list(msg: &Message) -> String {
    msg.fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Capitalized type tag for the reply-side send calls (`sendShort`,
/// `prepareToSendFloats`, ...).
fn send_name(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Byte => "Byte",
        FieldType::Short => "Short",
        FieldType::Float => "Float",
        FieldType::Int => "Int",
    }
}

// C++ ========================================================================

fn emit_cpp(catalog: &MessageCatalog, profile: &TargetProfile) -> String {
    let mut w = SourceWriter::new("    ");
    w.line("/*");
    w.line("   Serial task with message dispatch and serializers.");
    w.line("");
    w.line("   Generated code: do not edit.");
    w.line("*/");
    w.blank();
    w.line("#pragma once");
    w.blank();
    w.line("#include <stdint.h>");
    w.line("#include <string.h>");
    w.blank();
    w.line("#include <RFT_serialtask.hpp>");
    w.blank();
    w.line("class MySerialTask : public rft::SerialTask {");
    w.blank();
    w.push();

    // Frame-local XOR checksum; same domain as the runtime parser.
    w.line("private:");
    w.blank();
    w.push();
    w.line("static uint8_t crc8(const uint8_t * data, uint8_t size)");
    w.line("{");
    w.push();
    w.line("uint8_t crc = 0;");
    w.line("for (uint8_t k = 0; k < size; ++k) {");
    w.push();
    w.line("crc ^= data[k];");
    w.pop();
    w.line("}");
    w.line("return crc;");
    w.pop();
    w.line("}");
    w.pop();
    w.blank();

    // Handler stubs: request-class handlers take references so the
    // override can fill the reply values; state handlers receive decoded
    // values.
    for msg in catalog.iter() {
        let (suffix, by_ref) = if msg.is_request() {
            ("_Request", true)
        } else {
            ("", false)
        };
        w.push();
        w.line(format!(
            "virtual void handle_{}{}({})",
            msg.name,
            suffix,
            param_list(profile, msg, by_ref)
        ));
        w.line("{");
        w.line("}");
        w.pop();
        w.blank();
    }

    // Dispatcher.
    w.line("protected:");
    w.blank();
    w.push();
    w.line("void dispatchMessage(void) override");
    w.line("{");
    w.push();
    w.line("switch (_command) {");
    w.blank();
    w.push();
    for msg in catalog.iter() {
        w.line(format!("case {}: {{", msg.id));
        w.push();
        for slot in slots(msg) {
            w.line(format!("{} {} = 0;", profile.decl(slot.ty), slot.name));
            if !msg.is_request() {
                w.line(format!(
                    "memcpy(&{}, &_inBuf[{}], sizeof({}));",
                    slot.name,
                    slot.offset,
                    profile.decl(slot.ty)
                ));
            }
        }
        let suffix = if msg.is_request() { "_Request" } else { "" };
        w.line(format!("handle_{}{}({});", msg.name, suffix, arg_list(msg)));
        if msg.is_request() {
            if let Some(ty) = msg.uniform_field_type() {
                w.line(format!(
                    "prepareToSend{}s({});",
                    send_name(ty),
                    msg.fields.len()
                ));
                for f in &msg.fields {
                    w.line(format!("send{}({});", send_name(ty), f.name));
                }
                w.line("serialize8(_checksum);");
            }
        }
        w.pop();
        w.line("} break;");
        w.blank();
    }
    w.pop();
    w.line("}");
    w.pop();
    w.line("} // dispatchMessage");
    w.pop();
    w.blank();

    // Serializers.
    w.line("public:");
    w.blank();
    w.push();
    for msg in catalog.iter() {
        let params = param_list(profile, msg, false);
        let sep = if params.is_empty() { "" } else { ", " };
        w.line(format!(
            "static uint8_t serialize_{}(uint8_t * bytes{}{})",
            msg.name, sep, params
        ));
        w.line("{");
        w.push();
        w.line(format!("bytes[0] = {};", HDR_PREAMBLE));
        w.line(format!("bytes[1] = {};", HDR_MAGIC));
        w.line(format!("bytes[2] = {};", direction_literal(msg)));
        w.line(format!("bytes[3] = {};", msg.payload_size()));
        w.line(format!("bytes[4] = {};", msg.id));
        for slot in slots(msg) {
            w.line(format!(
                "memcpy(&bytes[{}], &{}, sizeof({}));",
                5 + slot.offset,
                slot.name,
                profile.decl(slot.ty)
            ));
        }
        w.line(format!(
            "bytes[{}] = crc8(&bytes[3], {});",
            frame_size(msg) - 1,
            checksum_span(msg)
        ));
        w.line(format!("return {};", frame_size(msg)));
        w.pop();
        w.line("}");
        w.blank();

        if msg.is_request() {
            w.line(format!(
                "static uint8_t serialize_{}_Request(uint8_t * bytes)",
                msg.name
            ));
            w.line("{");
            w.push();
            w.line(format!("bytes[0] = {};", HDR_PREAMBLE));
            w.line(format!("bytes[1] = {};", HDR_MAGIC));
            w.line(format!("bytes[2] = {};", DIR_TO_CONTROLLER));
            w.line("bytes[3] = 0;");
            w.line(format!("bytes[4] = {};", msg.id));
            w.line(format!("bytes[5] = {};", msg.id));
            w.line("bytes[6] = crc8(&bytes[3], 3);");
            w.line("return 7;");
            w.pop();
            w.line("}");
            w.blank();
        }
    }
    w.pop();

    w.pop();
    w.line("}; // class MySerialTask");
    w.finish()
}

// Python =====================================================================

fn emit_python(catalog: &MessageCatalog, profile: &TargetProfile) -> String {
    let mut w = SourceWriter::new("    ");
    w.line("#  Message dispatcher and serializers.");
    w.line("#");
    w.line("#  Generated code: do not edit.");
    w.blank();
    w.line("import struct");
    w.blank();
    w.line("from msppg import Parser");
    w.blank();
    w.blank();
    w.line("def _crc8(data):");
    w.push();
    w.line("crc = 0");
    w.line("for b in data:");
    w.push();
    w.line("crc ^= b");
    w.pop();
    w.line("return crc");
    w.pop();
    w.blank();
    w.blank();
    w.line("class MyParser(Parser):");
    w.blank();
    w.push();
    w.line("def dispatchMessage(self):");
    w.blank();
    w.push();
    for msg in catalog.iter() {
        let codes: String = msg.fields.iter().map(|f| profile.decl(f.ty)).collect();
        w.line(format!("if self.message_id == {}:", msg.id));
        w.push();
        if msg.is_request() {
            w.line("if self.message_direction == 0:");
            w.push();
            w.line(format!("self.handle_{}_Request()", msg.name));
            w.pop();
            w.line("else:");
            w.push();
            if msg.fields.is_empty() {
                w.line(format!("self.handle_{}()", msg.name));
            } else {
                w.line(format!(
                    "self.handle_{}(*struct.unpack('={}', self.message_buffer))",
                    msg.name, codes
                ));
            }
            w.pop();
        } else if msg.fields.is_empty() {
            w.line(format!("self.handle_{}()", msg.name));
        } else {
            w.line(format!(
                "self.handle_{}(*struct.unpack('={}', self.message_buffer))",
                msg.name, codes
            ));
        }
        w.pop();
        w.blank();
    }
    w.pop();

    // Handler stubs.
    for msg in catalog.iter() {
        let args = if msg.fields.is_empty() {
            "self".to_string()
        } else {
            format!("self, {}", arg_list(msg))
        };
        w.line(format!("def handle_{}({}):", msg.name, args));
        w.push();
        w.line("'''");
        w.line(format!(
            "Overridable handler for a decoded {} message.",
            msg.name
        ));
        w.line("'''");
        w.line("return");
        w.pop();
        w.blank();
        if msg.is_request() {
            w.line(format!("def handle_{}_Request(self):", msg.name));
            w.push();
            w.line("'''");
            w.line(format!(
                "Overridable handler for an observed {} request.",
                msg.name
            ));
            w.line("'''");
            w.line("return");
            w.pop();
            w.blank();
        }
    }
    w.pop();
    w.blank();

    // Module-level serializers.
    for msg in catalog.iter() {
        let codes: String = msg.fields.iter().map(|f| profile.decl(f.ty)).collect();
        w.line(format!("def serialize_{}({}):", msg.name, arg_list(msg)));
        w.push();
        w.line("'''");
        w.line(format!("Serializes a {} message.", msg.name));
        w.line("'''");
        if msg.fields.is_empty() {
            w.line("message_buffer = b''");
        } else {
            w.line(format!(
                "message_buffer = struct.pack('={}', {})",
                codes,
                arg_list(msg)
            ));
        }
        w.line(format!(
            "msg = [len(message_buffer), {}] + list(message_buffer)",
            msg.id
        ));
        w.line(format!(
            "return bytes([{}, {}, {}] + msg + [_crc8(msg)])",
            HDR_PREAMBLE,
            HDR_MAGIC,
            direction_literal(msg)
        ));
        w.pop();
        w.blank();
        w.blank();
        if msg.is_request() {
            w.line(format!("def serialize_{}_Request():", msg.name));
            w.push();
            w.line("'''");
            w.line(format!("Serializes a request for {} data.", msg.name));
            w.line("'''");
            w.line(format!("msg = [0, {}, {}]", msg.id, msg.id));
            w.line(format!(
                "return bytes([{}, {}, {}] + msg + [_crc8(msg)])",
                HDR_PREAMBLE, HDR_MAGIC, DIR_TO_CONTROLLER
            ));
            w.pop();
            w.blank();
            w.blank();
        }
    }
    w.finish()
}

// Java =======================================================================

/// ByteBuffer accessor suffix per type (`bb.get(0)`, `bb.getShort(2)`, ...).
fn java_bb(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Byte => "",
        FieldType::Short => "Short",
        FieldType::Float => "Float",
        FieldType::Int => "Int",
    }
}

/// ByteBuffer writer call for one field.
fn java_put(ty: FieldType, name: &str) -> String {
    match ty {
        FieldType::Byte => format!("bb.put({});", name),
        FieldType::Short => format!("bb.putShort({});", name),
        FieldType::Float => format!("bb.putFloat({});", name),
        FieldType::Int => format!("bb.putInt({});", name),
    }
}

fn emit_java(catalog: &MessageCatalog, profile: &TargetProfile) -> String {
    let mut w = SourceWriter::new("    ");
    w.line("/*");
    w.line("   Message dispatcher and serializers.");
    w.line("");
    w.line("   Generated code: do not edit.");
    w.line("*/");
    w.blank();
    w.line("import java.nio.ByteBuffer;");
    w.line("import java.nio.ByteOrder;");
    w.blank();
    w.line("import edu.wlu.cs.msppg.Parser;");
    w.blank();
    w.line("public class MyParser extends Parser {");
    w.blank();
    w.push();
    w.line("private static byte crc8(byte [] data, int start, int end) {");
    w.push();
    w.line("byte crc = 0;");
    w.line("for (int k = start; k < end; ++k) {");
    w.push();
    w.line("crc ^= data[k];");
    w.pop();
    w.line("}");
    w.line("return crc;");
    w.pop();
    w.line("}");
    w.blank();

    // Dispatcher over incoming frames (replies and state messages).
    w.line("protected void dispatchMessage() {");
    w.blank();
    w.push();
    w.line("switch (_command) {");
    w.blank();
    w.push();
    for msg in catalog.iter() {
        w.line(format!("case (byte){}: {{", msg.id));
        w.push();
        if msg.fields.is_empty() {
            w.line(format!("this.handle_{}();", msg.name));
        } else {
            w.line("ByteBuffer bb = ByteBuffer.wrap(_inBuf).order(ByteOrder.LITTLE_ENDIAN);");
            w.line(format!("this.handle_{}(", msg.name));
            w.push();
            let field_slots = slots(msg);
            for (k, slot) in field_slots.iter().enumerate() {
                let comma = if k + 1 < field_slots.len() { "," } else { ");" };
                w.line(format!("bb.get{}({}){}", java_bb(slot.ty), slot.offset, comma));
            }
            w.pop();
        }
        w.pop();
        w.line("} break;");
        w.blank();
    }
    w.pop();
    w.line("}");
    w.pop();
    w.line("}");
    w.blank();

    // Handler stubs.
    for msg in catalog.iter() {
        w.line(format!(
            "protected void handle_{}({}) {{",
            msg.name,
            param_list(profile, msg, false)
        ));
        w.line("}");
        w.blank();
    }

    // Serializers.
    for msg in catalog.iter() {
        w.line(format!(
            "public byte [] serialize_{}({}) {{",
            msg.name,
            param_list(profile, msg, false)
        ));
        w.push();
        w.line(format!(
            "ByteBuffer bb = ByteBuffer.allocate({}).order(ByteOrder.LITTLE_ENDIAN);",
            frame_size(msg)
        ));
        w.line(format!("bb.put((byte){});", HDR_PREAMBLE));
        w.line(format!("bb.put((byte){});", HDR_MAGIC));
        w.line(format!("bb.put((byte){});", direction_literal(msg)));
        w.line(format!("bb.put((byte){});", msg.payload_size()));
        w.line(format!("bb.put((byte){});", msg.id));
        for f in &msg.fields {
            w.line(java_put(f.ty, &f.name));
        }
        w.line("byte [] message = bb.array();");
        w.line(format!(
            "message[{}] = crc8(message, 3, {});",
            frame_size(msg) - 1,
            frame_size(msg) - 1
        ));
        w.line("return message;");
        w.pop();
        w.line("}");
        w.blank();

        if msg.is_request() {
            w.line(format!(
                "public byte [] serialize_{}_Request() {{",
                msg.name
            ));
            w.push();
            w.line("byte [] message = new byte[7];");
            w.line(format!("message[0] = {};", HDR_PREAMBLE));
            w.line(format!("message[1] = {};", HDR_MAGIC));
            w.line(format!("message[2] = {};", DIR_TO_CONTROLLER));
            w.line("message[3] = 0;");
            w.line(format!("message[4] = (byte){};", msg.id));
            w.line(format!("message[5] = (byte){};", msg.id));
            w.line("message[6] = crc8(message, 3, 6);");
            w.line("return message;");
            w.pop();
            w.line("}");
            w.blank();
        }
    }

    w.pop();
    w.line("}");
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MessageCatalog;

    fn catalog() -> MessageCatalog {
        let src = r#"{
            "ATTITUDE": [
                {"ID": "108"},
                {"roll": "short"},
                {"pitch": "short"},
                {"yaw": "short"}
            ],
            "ALTITUDE": [
                {"ID": "206"},
                {"estalt": "int"},
                {"vario": "short"}
            ]
        }"#;
        MessageCatalog::from_json(src).expect("load")
    }

    #[test]
    fn generation_is_deterministic() {
        let catalog = catalog();
        for profile in TargetProfile::all() {
            let a = generate(&catalog, &profile).expect("generate");
            let b = generate(&catalog, &profile).expect("generate");
            assert_eq!(a.source, b.source, "{} output must be stable", a.language);
        }
    }

    #[test]
    fn mixed_type_request_is_rejected() {
        let src = r#"{
            "BAD_REPLY": [
                {"ID": "50"},
                {"a": "short"},
                {"b": "float"}
            ]
        }"#;
        let catalog = MessageCatalog::from_json(src).expect("load");
        let err = generate(&catalog, &TargetProfile::cpp()).unwrap_err();
        assert!(matches!(err, EmitError::MixedTypeReply { .. }));
    }

    #[test]
    fn mixed_type_state_message_is_fine() {
        let catalog = catalog();
        // ALTITUDE mixes int and short but is a state message.
        assert!(validate_for_generation(&catalog).is_ok());
    }

    #[test]
    fn cpp_dispatcher_decodes_at_cumulative_offsets() {
        let artifact = generate(&catalog(), &TargetProfile::cpp()).expect("generate");
        assert!(artifact.source.contains("memcpy(&estalt, &_inBuf[0], sizeof(int32_t));"));
        assert!(artifact.source.contains("memcpy(&vario, &_inBuf[4], sizeof(int16_t));"));
    }

    #[test]
    fn cpp_request_case_sends_uniform_reply() {
        let artifact = generate(&catalog(), &TargetProfile::cpp()).expect("generate");
        assert!(artifact.source.contains("handle_ATTITUDE_Request(roll, pitch, yaw);"));
        assert!(artifact.source.contains("prepareToSendShorts(3);"));
        assert!(artifact.source.contains("sendShort(yaw);"));
    }

    #[test]
    fn python_serializer_covers_checksum_domain() {
        let artifact = generate(&catalog(), &TargetProfile::python()).expect("generate");
        assert!(artifact
            .source
            .contains("msg = [len(message_buffer), 108] + list(message_buffer)"));
        assert!(artifact.source.contains("+ msg + [_crc8(msg)])"));
        assert!(artifact.source.contains("struct.unpack('=hhh', self.message_buffer)"));
    }

    #[test]
    fn java_request_serializer_doubles_the_id() {
        let artifact = generate(&catalog(), &TargetProfile::java()).expect("generate");
        assert!(artifact.source.contains("message[4] = (byte)108;"));
        assert!(artifact.source.contains("message[5] = (byte)108;"));
        assert!(artifact.source.contains("message[6] = crc8(message, 3, 6);"));
    }

    #[test]
    fn comment_fields_never_reach_signatures() {
        let src = r#"{
            "RC_NORMAL": [
                {"ID": "121"},
                {"comment": "channels"},
                {"c1": "float"},
                {"c2": "float"}
            ]
        }"#;
        let catalog = MessageCatalog::from_json(src).expect("load");
        for profile in TargetProfile::all() {
            let artifact = generate(&catalog, &profile).expect("generate");
            assert!(
                !artifact.source.to_lowercase().contains("comment"),
                "{} output leaked a comment field",
                artifact.language
            );
        }
    }
}
