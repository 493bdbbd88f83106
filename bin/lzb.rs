use std::io::{BufReader, BufWriter, Write};
use std::{env, fs, io, process};

use lzb::decode::Decoder;
use lzb::encode::Encoder;

enum Operation {
    Compress,
    Decompress,
}

fn main() {
    let mut args = env::args().skip(1);
    let (mode, input, output) = match (args.next(), args.next(), args.next(), args.next()) {
        (Some(mode), Some(input), Some(output), None) => (mode, input, output),
        _ => explain(),
    };
    let operation = match mode.as_str() {
        "c" => Operation::Compress,
        "d" => Operation::Decompress,
        _ => explain(),
    };

    match run(operation, &input, &output) {
        Ok((bytes_read, bytes_written)) => {
            if bytes_read > 0 {
                let ratio = (bytes_written as f64 / bytes_read as f64 * 100.0).ceil();
                println!("{} bytes -> {} bytes ({}%)", bytes_read, bytes_written, ratio);
            } else {
                println!("{} bytes -> {} bytes", bytes_read, bytes_written);
            }
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}

fn run(operation: Operation, input: &str, output: &str) -> io::Result<(u64, u64)> {
    let reader = BufReader::new(fs::File::open(input)?);
    let mut writer = BufWriter::new(fs::File::create(output)?);

    let result = match operation {
        Operation::Compress => Encoder::new().encode_all(reader, &mut writer),
        Operation::Decompress => Decoder::new().decode_all(reader, &mut writer),
    };
    result.status?;
    writer.flush()?;
    Ok((result.bytes_read, result.bytes_written))
}

fn explain<T>() -> T {
    println!(
        "Usage: lzb [c|d] <input> <output>\n\
        Arguments:\n\
        c\t compress <input> into <output>\n\
        d\t decompress <input> into <output>"
    );
    process::exit(1);
}
