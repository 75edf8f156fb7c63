//! `h3frame` binary: encode and decode HTTP/3 frames from the shell.

mod cli;

use std::{error::Error, sync::Arc};

use bytes::Bytes;
use clap::Parser;
use h3frame::{
    config::{ParserConfig, UnknownFramePolicy},
    frame::{DataFrame, Frame},
    generator::MessageGenerator,
    parser::MessageParser,
    pool::{Lease, NullBufferPool},
    stream::StreamId,
};

use crate::cli::{Cli, Command, DecodeArgs, EncodeArgs};

fn main() -> Result<(), Box<dyn Error>> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    match Cli::parse().command {
        Command::Encode(args) => encode(args),
        Command::Decode(args) => decode(args),
    }
}

fn encode(args: EncodeArgs) -> Result<(), Box<dyn Error>> {
    let generator = MessageGenerator::new(args.capacity, !args.copy);
    let frame = Frame::from(DataFrame::new(Bytes::from(args.data), args.last));
    let mut lease = Lease::new(Arc::new(NullBufferPool));
    generator.generate(&mut lease, StreamId::new(args.stream_id), &frame)?;

    for buffer in lease.buffers() {
        println!("{}", to_hex(buffer));
    }
    if args.last {
        println!("fin");
    }
    Ok(())
}

fn decode(args: DecodeArgs) -> Result<(), Box<dyn Error>> {
    let policy = if args.lenient {
        UnknownFramePolicy::Lenient
    } else {
        UnknownFramePolicy::Strict
    };
    let config = ParserConfig::default().unknown_frame_policy(policy);
    let mut parser = MessageParser::with_config(StreamId::new(args.stream_id), config);

    let input = Bytes::from(args.input.0);
    let chunk_size = args.chunk_size.unwrap_or(input.len()).max(1);
    let mut offset = 0;
    loop {
        let end = (offset + chunk_size).min(input.len());
        let mut chunk = input.slice(offset..end);
        let final_chunk = end == input.len();
        loop {
            let frame = if final_chunk {
                parser.parse_last(&mut chunk)?
            } else {
                parser.parse(&mut chunk)?
            };
            match frame {
                Some(frame) => print_frame(&frame),
                None => break,
            }
        }
        if final_chunk {
            return Ok(());
        }
        offset = end;
    }
}

fn print_frame(frame: &Frame) {
    match frame {
        Frame::Data(data) => println!(
            "{} len={} last={} {}",
            frame.frame_type(),
            data.data().len(),
            data.is_last(),
            to_hex(data.data())
        ),
        Frame::Headers(headers) => {
            println!("{} {}", frame.frame_type(), to_hex(headers.field_section()));
        }
        Frame::Settings(settings) => {
            let pairs: Vec<String> = settings
                .settings()
                .iter()
                .map(|setting| format!("{:#x}={}", setting.id, setting.value))
                .collect();
            println!("{} {}", frame.frame_type(), pairs.join(" "));
        }
        Frame::PushPromise(push) => println!(
            "{} push_id={} {}",
            frame.frame_type(),
            push.push_id(),
            to_hex(push.field_section())
        ),
        Frame::CancelPush(cancel) => println!("{} push_id={}", frame.frame_type(), cancel.push_id()),
        Frame::GoAway(goaway) => println!("{} id={}", frame.frame_type(), goaway.id()),
        Frame::MaxPushId(max) => println!("{} push_id={}", frame.frame_type(), max.push_id()),
    }
}

fn to_hex(bytes: &[u8]) -> String { bytes.iter().map(|byte| format!("{byte:02x}")).collect() }
