//! Frame decoder fuzz target: feed arbitrary bytes to the state machine.
//! The decoder must never panic; checksum failures and noise are expected.
//! Build with: cargo fuzz run frame_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut decoder = mspgen::FrameDecoder::new();
    for &b in data {
        let _ = decoder.feed(b);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run frame_fuzz");
}
