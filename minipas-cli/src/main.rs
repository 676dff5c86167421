//! Entrypoint for CLI
use std::{env, error::Error, fs, path::Path, process};

use log::{error, info};
use minipas::{prelude::*, IMPL_VERSION};

static USAGE: &str = r#"
usage: minipas CMD FILE.pas

commands:
    scan    Print the token stream of the target source file
    dump    Scan the target source file, then print the symbol table

examples:
    minipas scan payroll.pas
    minipas dump payroll.pas
"#;

fn run_scanner(filepath: impl AsRef<str>) -> MiniPasResult<()> {
    info!("running scanner");

    let source = read_source(filepath.as_ref())?;
    let mut symbols = SymbolTable::new()?;
    let mut scanner = Scanner::new(source.as_str(), &mut symbols);

    println!("line | token      | lexeme");
    loop {
        let token = match scanner.next_token() {
            Ok(token) => token,
            Err(err) => {
                error!("scan error\n{err}");
                // Exit process with error
                return Err(err);
            }
        };

        if token.is_eof() {
            break;
        }
        if let Some(attr) = token.attr {
            println!(
                "{0:4} | {1: <10} | {2}",
                token.line,
                token.class,
                scanner.symbols().lexeme(attr)
            );
        }
    }

    Ok(())
}

fn run_dump(filepath: impl AsRef<str>) -> MiniPasResult<()> {
    info!("running scanner for symbol table dump");

    let source = read_source(filepath.as_ref())?;
    let mut symbols = SymbolTable::new()?;
    let scanner = Scanner::new(source.as_str(), &mut symbols);

    // Drain the unit so every lexeme is interned before the report.
    for result in scanner {
        if let Err(err) = result {
            error!("scan error\n{err}");
            return Err(err);
        }
    }

    println!("{}", symbols.dump()?);

    Ok(())
}

/// Read a source file, rejecting anything without the `.pas`
/// extension before any scanning begins.
fn read_source(filepath: &str) -> MiniPasResult<String> {
    let path = Path::new(filepath);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pas") => {}
        _ => {
            return Err(MiniPasError::Config(format!(
                "only Pascal files with extension .pas allowed: {}",
                filepath
            )))
        }
    }
    Ok(fs::read_to_string(path)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    match parse_args() {
        Some(Cmd::Scan { filepath }) => run_scanner(filepath)?,
        Some(Cmd::Dump { filepath }) => run_dump(filepath)?,
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            process::exit(64)
        }
    }

    Ok(())
}

fn parse_args() -> Option<Cmd> {
    let mut args = env::args().skip(1);
    match args.next() {
        Some(cmd) => match cmd.as_str() {
            "scan" => Some(Cmd::Scan {
                filepath: consume_arg(args)?,
            }),
            "dump" => Some(Cmd::Dump {
                filepath: consume_arg(args)?,
            }),
            _ => None,
        },
        None => None,
    }
}

/// Consumes the next positional argument.
fn consume_arg(mut args: impl Iterator<Item = String>) -> Option<String> {
    args.next()
}

fn print_usage() {
    println!("MiniPas v{IMPL_VERSION}");
    println!("{USAGE}");
}

enum Cmd {
    /// Print tokens
    Scan { filepath: String },
    /// Dump symbol table
    Dump { filepath: String },
}
