//! VDF command-line tool for checking, querying, and transcoding KeyValues
//! documents.
//!
//! Usage: vdf [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (json, paths, yaml, toml, cbor, diag)
//!   -g, --get <PATH>       Select a node by slash-separated key path
//!   -r, --raw              Print a selected leaf's value verbatim
//!   -w, --write            Write output next to the input, named by format
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   -v, --verbose          Log parser diagnostics to stderr
//!   -h, --help             Print help
//!   -V, --version          Print version

use libvdf::{encode_node, parse_with_filename, Format, NodeRef};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

mod transcode;

/// Output format selected with -t.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Paths,
    Yaml,
    Toml,
    Cbor,
    CborDiag,
}

/// Where rendered output goes.
#[derive(Debug)]
enum Output {
    Stdout,
    File(PathBuf),
    /// Beside each input file, with the extension of the output format.
    BesideInput,
}

/// Settings shared by every input processed in one invocation.
#[derive(Debug)]
struct Options {
    format: OutputFormat,
    query: Vec<String>,
    raw: bool,
    output: Output,
    check_only: bool,
}

fn main() {
    let mut args = std::env::args().skip(1);

    let mut format = OutputFormat::Json;
    let mut query = Vec::new();
    let mut raw = false;
    let mut write_back = false;
    let mut output_file: Option<String> = None;
    let mut check_only = false;
    let mut verbose = false;
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("vdf {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                let name = required_value(&arg, &mut args);
                format = parse_format(&name)
                    .unwrap_or_else(|| fail(&format!("Unknown format: {}", name)));
            }
            "-g" | "--get" => {
                query = parse_query(&required_value(&arg, &mut args));
            }
            "-r" | "--raw" => raw = true,
            "-w" | "--write" => write_back = true,
            "-o" | "--output" => output_file = Some(required_value(&arg, &mut args)),
            "--check" => check_only = true,
            "-v" | "--verbose" => verbose = true,
            // Explicit stdin
            "-" => {}
            other if other.starts_with('-') => fail(&format!("Unknown option: {}", other)),
            _ => {
                if input_path.is_some() {
                    fail("Multiple input paths not supported");
                }
                input_path = Some(arg.clone());
            }
        }
    }

    init_logging(verbose);

    let output = match (write_back, output_file) {
        (true, Some(_)) => fail("--write and --output are mutually exclusive"),
        (true, None) => Output::BesideInput,
        (false, Some(path)) => Output::File(PathBuf::from(path)),
        (false, None) => Output::Stdout,
    };
    let options = Options {
        format,
        query,
        raw,
        output,
        check_only,
    };

    let outcome = match input_path.as_deref() {
        Some(path) if Path::new(path).is_dir() => {
            if matches!(options.output, Output::File(_)) {
                fail("--output cannot be used with directory input");
            }
            process_directory(Path::new(path), &options)
        }
        Some(path) => fs::read(path)
            .map_err(|e| format!("Error reading {}: {}", path, e))
            .and_then(|input| process_input(&input, Some(path), &options)),
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .map_err(|e| format!("Error reading stdin: {}", e))
                .and_then(|_| process_input(&input, None, &options))
        }
    };

    if let Err(message) = outcome {
        eprintln!("{}", message);
        process::exit(1);
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn required_value(flag: &str, args: &mut impl Iterator<Item = String>) -> String {
    args.next()
        .unwrap_or_else(|| fail(&format!("{} requires an argument", flag)))
}

/// Install the logger. Parse errors are printed by the tool itself, so the
/// library's diagnostics only show up with -v or an explicit RUST_LOG.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn parse_format(s: &str) -> Option<OutputFormat> {
    match s {
        "json" => Some(OutputFormat::Json),
        "paths" => Some(OutputFormat::Paths),
        "yaml" | "yml" => Some(OutputFormat::Yaml),
        "toml" => Some(OutputFormat::Toml),
        "cbor" => Some(OutputFormat::Cbor),
        "diag" => Some(OutputFormat::CborDiag),
        _ => None,
    }
}

/// Split a `-g` argument into key segments; empty segments are ignored.
fn parse_query(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(String::from)
        .collect()
}

fn format_extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::Paths => "paths",
        OutputFormat::Yaml => "yaml",
        OutputFormat::Toml => "toml",
        OutputFormat::Cbor => "cbor",
        OutputFormat::CborDiag => "diag",
    }
}

/// Process every `*.vdf` file in `dir`, reporting failures as they happen.
fn process_directory(dir: &Path, options: &Options) -> Result<(), String> {
    let entries =
        fs::read_dir(dir).map_err(|e| format!("Error reading directory {}: {}", dir.display(), e))?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|e| e == "vdf"))
        .collect();
    paths.sort();

    let mut failures = 0;
    for path in &paths {
        let path_str = path.to_string_lossy();
        let outcome = fs::read(path)
            .map_err(|e| format!("Error reading {}: {}", path_str, e))
            .and_then(|input| process_input(&input, Some(&*path_str), options));
        if let Err(message) = outcome {
            eprintln!("{}", message);
            failures += 1;
        }
    }

    match failures {
        0 => Ok(()),
        n => Err(format!("{} of {} files failed", n, paths.len())),
    }
}

fn process_input(input: &[u8], input_file: Option<&str>, options: &Options) -> Result<(), String> {
    let filename = input_file.map(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| p.to_string())
    });
    let prefix = input_file.map(|p| format!("{}: ", p)).unwrap_or_default();

    let tree = parse_with_filename(input, filename.as_deref()).map_err(|e| match input_file {
        Some(path) => format!("{}: {}", path, e),
        None => format!("Parse error: {}", e),
    })?;

    if options.check_only {
        match input_file {
            Some(path) => println!("{}: ok", path),
            None => println!("ok"),
        }
        return Ok(());
    }

    let node = tree.root().get_path(&options.query).ok_or_else(|| {
        format!("{}Error: no node at path {}", prefix, options.query.join("/"))
    })?;

    let rendered = render(node, options).map_err(|e| format!("{}Error: {}", prefix, e))?;
    emit(&rendered, input_file, options)
}

/// Produce the bytes to write for `node`.
fn render(node: NodeRef<'_>, options: &Options) -> Result<Vec<u8>, String> {
    if options.raw {
        let value = node
            .value_bytes()
            .ok_or("--raw requires the selected node to be a key/value pair")?;
        return Ok(with_newline(value.to_vec()));
    }

    let text = match options.format {
        OutputFormat::Json => encode_node(node, Format::Json),
        OutputFormat::Paths => encode_node(node, Format::Paths),
        OutputFormat::Yaml => {
            transcode::yaml::encode(node).map_err(|e| format!("Cannot convert to YAML: {}", e))?
        }
        OutputFormat::Toml => {
            transcode::toml::encode(node).map_err(|e| format!("Cannot convert to TOML: {}", e))?
        }
        OutputFormat::Cbor => {
            return transcode::cbor::encode(node)
                .map_err(|e| format!("Cannot convert to CBOR: {}", e));
        }
        OutputFormat::CborDiag => transcode::cbor::encode(node)
            .and_then(|bytes| transcode::cbor::diagnostic(&bytes))
            .map_err(|e| format!("Cannot render CBOR diagnostic notation: {}", e))?,
    };
    Ok(with_newline(text.into_bytes()))
}

fn with_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.last() != Some(&b'\n') {
        bytes.push(b'\n');
    }
    bytes
}

fn emit(bytes: &[u8], input_file: Option<&str>, options: &Options) -> Result<(), String> {
    let path = match &options.output {
        Output::Stdout => {
            return io::stdout()
                .lock()
                .write_all(bytes)
                .map_err(|e| format!("Error writing to stdout: {}", e));
        }
        Output::File(path) => path.clone(),
        Output::BesideInput => match input_file {
            Some(input) => Path::new(input).with_extension(format_extension(options.format)),
            None => return Err("Error: --write requires an input file".to_string()),
        },
    };
    fs::write(&path, bytes).map_err(|e| format!("Error writing {}: {}", path.display(), e))
}

fn print_help() {
    println!(
        "vdf - KeyValues (VDF) command-line tool

USAGE:
    vdf [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .vdf files in it

OPTIONS:
    -t, --to <FORMAT>      Output format [default: json]
                           Supported: json, paths, yaml, toml, cbor, diag

                           Sections are listed most recently parsed first.
                           YAML and TOML keep only the last occurrence of a
                           duplicated key; json, paths, and cbor keep all.
                           yaml, toml, cbor, and diag refuse documents nested
                           more than 128 sections deep.

    -g, --get <PATH>       Select a node by slash-separated key path
                           (e.g. LibraryFolders/1) and output only that node

    -r, --raw              Print the selected key/value pair's value verbatim

    -w, --write            Write output to file with inferred extension

    -o, --output <FILE>    Write output to specified file (not valid with directory input)

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    -v, --verbose          Log parser diagnostics to stderr (RUST_LOG overrides)

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Validate a manifest
    vdf --check appmanifest_570.vdf

    # Validate all VDF files in a directory
    vdf --check ~/.steam/steam/steamapps/

    # Convert to JSON
    vdf libraryfolders.vdf

    # List every key/value pair with its full path
    vdf -t paths config.vdf

    # Read one value for a shell script
    vdf -g LibraryFolders/1 --raw libraryfolders.vdf

    # Convert a section to YAML
    vdf -g AppState/UserConfig -t yaml appmanifest_570.vdf

    # Convert to CBOR (binary)
    vdf -t cbor config.vdf -o config.cbor

    # View the CBOR in diagnostic notation (RFC 8949 §8)
    vdf -t diag config.vdf

    # Convert all VDF files in a directory to JSON
    vdf -w ./configs/
"
    );
}
