//! Decode a raw byte capture of serial-protocol frames against a schema and
//! print each message's fields.
//!
//! Usage:
//!   mspdump --schema messages.json capture.bin
//!   some-producer | mspdump --schema messages.json
//!
//! Unknown IDs and checksum failures are counted, not fatal: the decoder
//! resynchronizes on the next '$'.

use anyhow::Context;
use clap::Parser;
use mspgen::codec;
use mspgen::frame::{FrameDecoder, FrameError};
use mspgen::schema::MessageCatalog;
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mspdump", about = "Dump decoded serial-protocol frames")]
struct Args {
    /// JSON message schema.
    #[arg(long, default_value = "messages.json")]
    schema: PathBuf,

    /// Raw frame capture; stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();

    let source = std::fs::read_to_string(&args.schema)
        .with_context(|| format!("reading schema {}", args.schema.display()))?;
    let catalog = MessageCatalog::from_json(&source)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;

    let mut bytes = Vec::new();
    match &args.input {
        Some(path) => {
            bytes = std::fs::read(path)
                .with_context(|| format!("reading capture {}", path.display()))?;
        }
        None => {
            std::io::stdin()
                .read_to_end(&mut bytes)
                .context("reading stdin")?;
        }
    }

    let mut decoder = FrameDecoder::new();
    let mut frames = 0usize;
    let mut unknown = 0usize;
    let mut malformed = 0usize;
    let mut bad_checksum = 0usize;

    for &b in &bytes {
        let frame = match decoder.feed(b) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(FrameError::ChecksumMismatch { .. }) => {
                bad_checksum += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        frames += 1;
        let Some(msg) = catalog.get_by_id(frame.id) else {
            unknown += 1;
            println!("[{}] id={} ({} bytes): unknown message ID", frames, frame.id, frame.payload.len());
            continue;
        };
        match codec::decode_payload(msg, &frame.payload) {
            Ok(values) => {
                let fields: Vec<String> = msg
                    .fields
                    .iter()
                    .zip(&values)
                    .map(|(f, v)| format!("{}={}", f.name, v))
                    .collect();
                println!("[{}] {} (id={}): {}", frames, msg.name, msg.id, fields.join(" "));
            }
            Err(e) => {
                malformed += 1;
                println!("[{}] {} (id={}): undecodable: {}", frames, msg.name, msg.id, e);
            }
        }
    }

    eprintln!(
        "{} frame(s): {} unknown id, {} malformed, {} checksum failure(s)",
        frames, unknown, malformed, bad_checksum
    );
    Ok(())
}
