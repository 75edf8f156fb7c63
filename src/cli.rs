//! Command line interface for the `h3frame` binary.
//!
//! Encodes a `DATA` frame to hex or decodes a hex frame stream, and feeds the
//! man page generated by the build script.

use clap::{Args, Parser, Subcommand};

/// Command line arguments for the `h3frame` binary.
#[derive(Debug, Parser)]
#[command(name = "h3frame", version, about = "Encode and decode HTTP/3 frames")]
pub struct Cli {
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a DATA frame and print its buffers as hex.
    Encode(EncodeArgs),
    /// Decode a hex frame stream and print each frame.
    Decode(DecodeArgs),
}

/// Options for `h3frame encode`.
#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Payload text carried by the frame.
    #[arg(short, long, default_value = "")]
    pub data: String,
    /// Mark the frame as the last on its stream.
    #[arg(long)]
    pub last: bool,
    /// Largest buffer the generator may fill.
    #[arg(long, default_value_t = 8192)]
    pub capacity: usize,
    /// Copy the payload instead of referencing it.
    #[arg(long)]
    pub copy: bool,
    /// Stream the frame is written to.
    #[arg(long, default_value_t = 0)]
    pub stream_id: u64,
}

/// Options for `h3frame decode`.
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Frame bytes as hex; whitespace is ignored.
    #[arg(value_parser = parse_hex)]
    pub input: HexInput,
    /// Skip unknown frame types instead of failing.
    #[arg(long)]
    pub lenient: bool,
    /// Stream the bytes were read from.
    #[arg(long, default_value_t = 0)]
    pub stream_id: u64,
    /// Feed the parser in chunks of this many bytes.
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub chunk_size: Option<usize>,
}

/// Bytes given on the command line as hex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HexInput(pub Vec<u8>);

/// Parse a hex string such as `"00 03 61 62 63"` into bytes.
///
/// # Errors
///
/// Returns a message when the input has an odd number of digits or a
/// character that is not a hex digit.
pub fn parse_hex(input: &str) -> Result<HexInput, String> {
    let digits: Vec<u8> = input
        .bytes()
        .filter(|byte| !byte.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return Err("hex input needs an even number of digits".to_owned());
    }
    digits
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|text| u8::from_str_radix(text, 16).ok())
                .ok_or_else(|| format!("invalid hex byte {:?}", String::from_utf8_lossy(pair)))
        })
        .collect::<Result<_, _>>()
        .map(HexInput)
}
