//! FernDB - interactive shell
//!
//! Reads a stream of commands separated by `;` (a command may span several
//! lines), runs each through the executor, and prints the collected output.
//! On startup the snapshot from the working directory is loaded if present;
//! EXIT writes it back and ends the process.

use std::io::{self, BufRead, Write};
use std::path::Path;

use ferndb::catalog::Catalog;
use ferndb::executor::{Executor, Flow, STATE_FILE};
use ferndb::output::Output;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
}

/// Load the snapshot if one exists, otherwise start empty
fn load_catalog() -> Catalog {
    let path = Path::new(STATE_FILE);
    if path.exists() {
        match Catalog::load(path) {
            Ok(catalog) => {
                println!("Persistent state loaded successfully.");
                catalog
            }
            Err(e) => {
                println!("Failed to load persistent state: {}", e);
                Catalog::new()
            }
        }
    } else {
        println!("No persistent state found. Starting with a clean DBMS.");
        Catalog::new()
    }
}

fn print_prompt() {
    print!("> ");
    io::stdout().flush().ok();
}

/// Run one framed command and print its output; returns the resulting flow
fn run_command(executor: &mut Executor, command: &str) -> Flow {
    let mut out = Output::new();
    let flow = executor.run(command, &mut out);
    for line in out.lines() {
        println!("{}", line);
    }
    flow
}

fn main() {
    init_tracing();

    let catalog = load_catalog();
    let mut executor = Executor::new(catalog);

    println!("Welcome to FernDB. Type commands ending with ';' and EXIT; to quit.");
    print_prompt();

    let stdin = io::stdin();
    let mut buffer = String::new();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        };
        buffer.push_str(&line);
        buffer.push('\n');

        // Execute every complete command in the buffer.
        while let Some(position) = buffer.find(';') {
            let command: String = buffer.drain(..=position).collect();
            let command = command.trim_end_matches(';').trim().to_string();
            if command.is_empty() {
                continue;
            }
            if let Flow::Exit(code) = run_command(&mut executor, &command) {
                std::process::exit(code);
            }
        }
        print_prompt();
    }

    // EOF: run whatever is left in the buffer as a final command.
    let trailing = buffer.trim().to_string();
    if !trailing.is_empty() {
        if let Flow::Exit(code) = run_command(&mut executor, &trailing) {
            std::process::exit(code);
        }
    }
}
