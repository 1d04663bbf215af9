/// hfz – CLI front-end for the hfz word-Huffman compressor.
///
/// Works similar to gzip:
///   hfz file.txt           → compress to file.txt.hf (removes original)
///   hfz -d file.txt.hf     → decompress to file.txt (removes original)
///   hfz -w 12 file.bin     → compress with 12-bit words
///   hfz -c file.txt        → compress to stdout
///   cat file | hfz -c      → compress stdin to stdout
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

fn usage() {
    eprintln!("hfz - Huffman compression over fixed-width bit-words");
    eprintln!();
    eprintln!("Usage: hfz [OPTIONS] [FILE]...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -w, --wordbits N   word width in bits, 1-32 (default: 8)");
    eprintln!("  -d, --decompress   Decompress mode");
    eprintln!("  -c, --stdout       Write to stdout (don't remove original)");
    eprintln!("  -k, --keep         Keep original file");
    eprintln!("  -f, --force        Overwrite existing output files");
    eprintln!("  -v, --verbose      Verbose output");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("If no FILE is given, reads from stdin and writes to stdout.");
    eprintln!("Compressed files use the .hf extension.");
}

#[derive(Debug)]
struct Opts {
    decompress: bool,
    to_stdout: bool,
    keep: bool,
    force: bool,
    verbose: bool,
    wordbits: usize,
    files: Vec<String>,
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts {
        decompress: false,
        to_stdout: false,
        keep: false,
        force: false,
        verbose: false,
        wordbits: 8,
        files: Vec::new(),
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-d" | "--decompress" => opts.decompress = true,
            "-c" | "--stdout" | "--to-stdout" => opts.to_stdout = true,
            "-k" | "--keep" => opts.keep = true,
            "-f" | "--force" => opts.force = true,
            "-v" | "--verbose" => opts.verbose = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-w" | "--wordbits" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("hfz: missing argument for -w");
                    process::exit(1);
                }
                opts.wordbits = match args[i].parse::<usize>() {
                    Ok(n) if (1..=32).contains(&n) => n,
                    _ => {
                        eprintln!("hfz: invalid word width '{}' (want 1-32)", args[i]);
                        process::exit(1);
                    }
                };
            }
            // Handle combined short flags like -dc, -kv, etc.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'd' => opts.decompress = true,
                        'c' => opts.to_stdout = true,
                        'k' => opts.keep = true,
                        'f' => opts.force = true,
                        'v' => opts.verbose = true,
                        _ => {
                            eprintln!("hfz: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            _ => {
                opts.files.push(arg.clone());
            }
        }
        i += 1;
    }

    opts
}

/// Output filename for compression: append `.hf`.
fn compress_output_path(input: &str) -> PathBuf {
    PathBuf::from(format!("{input}.hf"))
}

/// Output filename for decompression: strip a `.hf` suffix, otherwise
/// append `.dec`.
fn decompress_output_path(input: &str) -> PathBuf {
    let path = Path::new(input);
    match path.extension().and_then(|e| e.to_str()) {
        Some("hf") => path.with_extension(""),
        _ => PathBuf::from(format!("{input}.dec")),
    }
}

/// Write via a temporary sibling and rename, so a failure mid-write
/// never leaves a partial output file behind.
fn write_atomic(out_path: &Path, data: &[u8]) -> io::Result<()> {
    let tmp = PathBuf::from(format!("{}.tmp", out_path.display()));
    fs::write(&tmp, data)?;
    fs::rename(&tmp, out_path)
}

fn transform(opts: &Opts, input: &[u8]) -> Result<Vec<u8>, String> {
    if opts.decompress {
        hfz::decompress(input).map_err(|e| e.to_string())
    } else {
        hfz::compress(input, opts.wordbits).map_err(|e| e.to_string())
    }
}

fn process_file(opts: &Opts, path: &str) -> Result<(), String> {
    let input = fs::read(path).map_err(|e| format!("{path}: {e}"))?;
    let output = transform(opts, &input).map_err(|e| format!("{path}: {e}"))?;

    if opts.to_stdout {
        io::stdout()
            .write_all(&output)
            .map_err(|e| format!("stdout: {e}"))?;
        return Ok(());
    }

    let out_path = if opts.decompress {
        decompress_output_path(path)
    } else {
        compress_output_path(path)
    };
    let out_str = out_path.display().to_string();

    if out_path.exists() && !opts.force {
        return Err(format!("{out_str} already exists; use -f to overwrite"));
    }

    write_atomic(&out_path, &output).map_err(|e| format!("{out_str}: {e}"))?;

    if opts.verbose {
        let ratio = if input.is_empty() {
            0.0
        } else {
            (output.len() as f64 / input.len() as f64) * 100.0
        };
        eprintln!(
            "{path}: {ratio:.1}% ({} → {} bytes)",
            input.len(),
            output.len()
        );
    }

    if !opts.keep {
        fs::remove_file(path).map_err(|e| format!("{path}: cannot remove: {e}"))?;
    }

    Ok(())
}

fn process_stdin_stdout(opts: &Opts) -> Result<(), String> {
    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .map_err(|e| format!("stdin: {e}"))?;
    let output = transform(opts, &input).map_err(|e| format!("stdin: {e}"))?;
    io::stdout()
        .write_all(&output)
        .map_err(|e| format!("stdout: {e}"))?;
    Ok(())
}

fn run() -> Result<(), ()> {
    let opts = parse_args();
    let mut had_error = false;

    if opts.files.is_empty() {
        if let Err(e) = process_stdin_stdout(&opts) {
            eprintln!("hfz: {e}");
            return Err(());
        }
        return Ok(());
    }

    for path in &opts.files {
        let result = if path == "-" {
            process_stdin_stdout(&opts)
        } else {
            process_file(&opts, path)
        };

        if let Err(e) = result {
            eprintln!("hfz: {e}");
            had_error = true;
        }
    }

    if had_error {
        Err(())
    } else {
        Ok(())
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}
