use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::time::Instant;
use std::{env, path::Path, path::PathBuf};

use huffb0x::{histogram, par_histogram, CodeTable, HuffmanError, HuffmanTree};
use huffb0x::{helpers, huffman};

/// Inputs at least this big get the parallel histogram.
const PAR_THRESHOLD: usize = 1 << 22; // 4MiB

#[derive(Clone, Copy)]
enum Action {
    Compress,
    Decompress,
    Test,
}

fn main() -> Result<(), HuffmanError> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        print_usage_and_panic("Invokation doesn't match usage! Provide 2 arguments.");
    }
    let path = PathBuf::from(&args[2]);
    let action = match args[1].as_str() {
        "c" => Action::Compress,
        "d" => Action::Decompress,
        "t" => Action::Test,
        _ => {
            print_usage_and_panic("Unrecognized option -> <action>!");
            unreachable!();
        }
    };

    if !path.is_file() && !path.is_dir() {
        panic!("Path must be a file or a directory!");
    }

    if path.is_dir() {
        for file in fs::read_dir(path)? {
            let file_path = file?.path();
            if file_path.is_file() {
                run(file_path, action)?;
            }
        }
    } else if path.is_file() {
        run(path, action)?;
    }

    Ok(())
}

fn run(file_path: PathBuf, action: Action) -> Result<(), HuffmanError> {
    assert!(file_path.is_file());

    let mut out_path = std::env::current_dir()?;
    out_path.push(file_path.file_name().expect("Invalid file!"));

    let compress_path = out_path.with_extension("huf");
    let table_path = out_path.with_extension("table");
    let decompress_path = out_path.with_extension("orig");

    let timer = Instant::now();
    match action {
        Action::Compress => {
            compress(&file_path, &compress_path, &table_path)?;
            println!("Compression took: {:?}", timer.elapsed());
        }
        Action::Decompress => {
            let table_path = file_path.with_extension("table");
            decompress(&file_path, &table_path, &decompress_path)?;
            println!("Decompression took: {:?}", timer.elapsed());
        }
        Action::Test => {
            compress(&file_path, &compress_path, &table_path)?;
            println!("Compression took: {:?}", timer.elapsed());
            let timer = Instant::now();
            decompress(&compress_path, &table_path, &decompress_path)?;
            println!("Decompression took: {:?}", timer.elapsed());
            helpers::cmp(&file_path, &decompress_path)?;
        }
    }

    Ok(())
}

/// Writes `<name>.huf` (8-byte BE symbol count, then the packed stream)
/// and the code table as a text side channel at `<name>.table`.
fn compress(input: &Path, packed_out: &Path, table_out: &Path) -> Result<(), HuffmanError> {
    let data = fs::read(input)?;

    let hist = if data.len() >= PAR_THRESHOLD { par_histogram(&data) } else { histogram(&data) };
    let table = match HuffmanTree::from_histogram(&hist) {
        Some(tree) => CodeTable::from_tree(&tree),
        None => CodeTable::new(), // empty input, empty table
    };
    println!("Expected code length: {:.4} bits/byte", table.expected_code_length(&hist));

    let encoded = huffman::encode(&data, &table)?;
    let mut writer = BufWriter::new(File::create(packed_out)?);
    writer.write_all(&encoded.symbol_count.to_be_bytes())?;
    writer.write_all(&encoded.data)?;
    writer.flush()?;

    let mut table_writer = BufWriter::new(File::create(table_out)?);
    table.to_writer(&mut table_writer)?;
    table_writer.flush()?;
    Ok(())
}

fn decompress(packed_in: &Path, table_in: &Path, output: &Path) -> Result<(), HuffmanError> {
    let mut reader = BufReader::new(File::open(packed_in)?);
    let mut count_buf = [0u8; 8];
    reader.read_exact(&mut count_buf)?;
    let symbol_count = u64::from_be_bytes(count_buf);
    let mut packed = Vec::new();
    reader.read_to_end(&mut packed)?;

    let table = CodeTable::from_reader(BufReader::new(File::open(table_in)?))?;

    let decoded = huffman::decode(&packed, &table, symbol_count)?;
    fs::write(output, decoded)?;
    Ok(())
}

fn print_usage_and_panic(panic_msg: &str) {
    println!("Usage: huffb0x <Action> <Path>");
    println!("<Action> [single file]: c (compress), d (decompress), t (test = c + d)");
    println!("<Path> can be a single file or a directory");
    println!("Note: Directories are shallow traversed");
    panic!("{panic_msg}");
}
