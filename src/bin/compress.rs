use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    process,
    time::Instant,
};

use clap::Parser;
use huffman_rust::{
    bitstreams::BinaryWriterBuilder,
    huffman::huffman_encoder::HuffmanEncoder,
    utils::{
        frequency::{byte_symbols, count_frequencies},
        logging::setup_logging,
    },
    CodeError, HuffmanTree, Properties,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(about = "Huffman-encode a file, storing the code table next to the encoded bits")]
struct Args {
    /// The file to compress
    source_name: String,
    /// The destination basename of the compressed files
    dest_name: String,
    /// Also write the code table as JSON to <dest_name>.code.json
    #[arg(long)]
    json: bool,
    /// Verbosity, repeat for more output
    #[arg(short = 'd', action = clap::ArgAction::Count)]
    debug: u8,
}

fn run(args: &Args) -> Result<(), CodeError> {
    let data = fs::read(&args.source_name)?;
    info!(bytes = data.len(), "Read {}", args.source_name);

    let comp_time = Instant::now();

    let tree = HuffmanTree::build(&count_frequencies(&data))?;
    let encoder = HuffmanEncoder::new(&tree);

    let mut writer = BinaryWriterBuilder::new();
    let bits = encoder.encode(byte_symbols(&data), &mut writer)?;
    let encoded = writer.build();

    debug!(bits, bytes = encoded.os.len(), "Encoded the input");

    let mut code_file = BufWriter::new(File::create(format!("{}.code", args.dest_name))?);
    tree.save(&mut code_file)?;
    code_file.flush()?;

    if args.json {
        let mut json_file = BufWriter::new(File::create(format!("{}.code.json", args.dest_name))?);
        serde_json::to_writer_pretty(&mut json_file, &tree.flatten())?;
        json_file.flush()?;
    }

    fs::write(format!("{}.short", args.dest_name), &encoded.os)?;

    let props = Properties {
        symbols: tree.num_symbols(),
        length: data.len(),
        bits,
    };
    let mut props_file = BufWriter::new(File::create(format!("{}.properties", args.dest_name))?);
    props.write(&mut props_file)?;
    props_file.flush()?;

    info!(
        "Compressed {} bytes into {} bytes in {}ns",
        data.len(),
        encoded.os.len(),
        comp_time.elapsed().as_nanos()
    );
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
