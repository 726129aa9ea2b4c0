mod logger;

use ansi_term::Colour::{Red, Yellow};
use log::{debug, info};
use logger::Logger;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use zx81::lang::{self, Directory, Error};
use zx81::mach;

static NAME: &str = "zx81";
static VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn main() {
    match run(env::args().collect()) {
        Ok(_) => process::exit(0),
        Err(err) => {
            eprintln!("{}: {}", Red.bold().paint("error"), err);
            process::exit(1)
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Direction {
    Encode,
    Decode,
    DecodeP81,
}

impl Direction {
    fn of(path: &Path) -> Direction {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("p") | Some("81") => Direction::Decode,
            Some("p81") => Direction::DecodeP81,
            _ => Direction::Encode,
        }
    }
}

fn build_options() -> getopts::Options {
    let mut opts = getopts::Options::new();
    opts.optopt("o", "output", "write to this file, - for stdout", "path")
        // Cassette
        .optflag("", "p81", "write a .p81 image with a cassette name")
        .optopt("", "name", "cassette name, defaults to the file name", "name")
        // Logging
        .optopt("", "loglevel", "set log level", "[error|warn|info|debug|trace]")
        .optmulti("", "log", "set log level for a target", "target=level")
        // Help
        .optflag("h", "help", "display this help")
        .optflag("V", "version", "display this version");
    opts
}

fn init_logging(matches: &getopts::Matches) -> Result<(), String> {
    let loglevel = matches
        .opt_str("loglevel")
        .unwrap_or_else(|| "error".to_string());
    let mut logger = Logger::new(&loglevel)?;
    for target_level in matches.opt_strs("log") {
        if let Some(equals) = target_level.find('=') {
            let (target, level) = target_level.split_at(equals);
            logger.add_target(target.to_string(), level[1..].to_string())?;
        } else {
            return Err(format!("invalid log target pair {}", target_level));
        }
    }
    Logger::enable(logger)
}

fn print_help(opts: &getopts::Options) {
    println!("{} {}", NAME, VERSION);
    println!();
    println!("Usage: {} [options] INPUT", NAME);
    print!(
        "{}",
        opts.usage("Converts .p, .81 and .p81 files to text and anything else to a P-file.")
    );
}

fn print_version() {
    println!("{} {}", NAME, VERSION);
}

fn run(args: Vec<String>) -> Result<(), String> {
    let opts = build_options();
    let matches = opts
        .parse(args.iter().skip(1))
        .map_err(|f| format!("invalid options\n{}", f))?;
    if matches.opt_present("help") {
        print_help(&opts);
        return Ok(());
    }
    if matches.opt_present("version") {
        print_version();
        return Ok(());
    }
    init_logging(&matches)?;
    let input = match matches.free.as_slice() {
        [input] => PathBuf::from(input),
        [] => return Err("no input file".to_string()),
        _ => return Err("only one input file can be converted at a time".to_string()),
    };
    let direction = Direction::of(&input);
    let p81 = matches.opt_present("p81");
    let output = match matches.opt_str("output") {
        Some(output) => PathBuf::from(output),
        None => input.with_extension(match direction {
            Direction::Encode if p81 => "p81",
            Direction::Encode => "p",
            _ => "bas",
        }),
    };
    debug!("{:?} {} to {}", direction, input.display(), output.display());
    match direction {
        Direction::Encode => {
            let p81 = p81 || Direction::of(&output) == Direction::DecodeP81;
            encode(&input, &output, p81, matches.opt_str("name"))
        }
        Direction::Decode | Direction::DecodeP81 => {
            let bytes = fs::read(&input)
                .map_err(|e| format!("failed to read {}: {}", input.display(), e))?;
            let text = if direction == Direction::DecodeP81 {
                mach::decode_p81(&bytes)
            } else {
                mach::decode(&bytes)
            };
            write(&output, text.as_bytes())
        }
    }
}

fn encode(input: &Path, output: &Path, p81: bool, name: Option<String>) -> Result<(), String> {
    let text = fs::read_to_string(input)
        .map_err(|e| format!("failed to read {}: {}", input.display(), e))?;
    let base = input.parent().map(Path::to_path_buf).unwrap_or_default();
    let encoding = match lang::encode_with(&text, &Directory(base)) {
        Ok(encoding) => encoding,
        Err(error) => {
            report(input, &error);
            return Err(format!("{} was not converted", input.display()));
        }
    };
    for warning in &encoding.warnings {
        report(input, warning);
    }
    if p81 {
        let name = name.unwrap_or_else(|| {
            input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("PROGRAM")
                .to_string()
        });
        let bytes = encoding.to_p81(&name).map_err(|e| e.text().to_string())?;
        write(output, &bytes)
    } else {
        write(output, &encoding.pfile)
    }
}

fn write(output: &Path, bytes: &[u8]) -> Result<(), String> {
    let result = if output == Path::new("-") {
        io::stdout().write_all(bytes)
    } else {
        fs::write(output, bytes)
    };
    result.map_err(|e| format!("failed to write {}: {}", output.display(), e))?;
    info!("wrote {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

/// Prints a diagnostic with 1-based line and column.
fn report(path: &Path, error: &Error) {
    let label = if error.is_warning() {
        Yellow.bold().paint("warning")
    } else {
        Red.bold().paint("error")
    };
    let message = if error.text().is_empty() {
        error.code().to_string()
    } else {
        error.text().to_string()
    };
    eprintln!(
        "{}:{}:{}: {}: {}",
        path.display(),
        error.line() + 1,
        error.column() + 1,
        label,
        message
    );
}
