use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    process,
    time::Instant,
};

use clap::Parser;
use huffman_rust::{
    bitstreams::BinaryReader,
    huffman::huffman_decoder::ByteSink,
    utils::logging::setup_logging,
    CodeError, HuffmanTree, Properties,
};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(about = "Decode a file produced by compress")]
struct Args {
    /// The basename of the compressed files
    source_name: String,
    /// The decompressed file
    dest_name: String,
    /// Verbosity, repeat for more output
    #[arg(short = 'd', action = clap::ArgAction::Count)]
    debug: u8,
}

fn run(args: &Args) -> Result<(), CodeError> {
    let props_file = File::open(format!("{}.properties", args.source_name))?;
    let props = Properties::read(BufReader::new(props_file))?;
    let code_file = File::open(format!("{}.code", args.source_name))?;
    let tree = HuffmanTree::load(BufReader::new(code_file))?;

    if tree.num_symbols() != props.symbols {
        warn!(
            "The code has {} symbols, the properties declare {}",
            tree.num_symbols(),
            props.symbols
        );
    }

    let mut output = BufWriter::new(File::create(&args.dest_name)?);

    if props.length == 0 {
        output.flush()?;
        info!("Empty input, nothing to decode");
        return Ok(());
    }

    let bytes = fs::read(format!("{}.short", args.source_name))?;
    let reader = BinaryReader::new(bytes.into_boxed_slice()).limit_bits(props.bits);
    if reader.bits_left() < props.bits {
        warn!("Expected {} bits, {} found", props.bits, reader.bits_left());
    }

    let decomp_time = Instant::now();

    let mut sink = ByteSink::new(output);
    let decoded = tree.translate(reader, &mut sink)?;
    sink.into_inner().flush()?;

    if decoded != props.length {
        warn!("Decoded {} symbols, expected {}", decoded, props.length);
    }

    info!("Decoded {} bytes in {}ns", decoded, decomp_time.elapsed().as_nanos());
    Ok(())
}

fn main() {
    let args = Args::parse();
    setup_logging(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
