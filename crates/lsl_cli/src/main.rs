use std::io::{self, BufRead, IsTerminal};
use std::process;

use lsl_cli::runner::Runner;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    if args.iter().any(|a| *a == "--help" || *a == "-h") {
        print_usage();
        return;
    }

    match args.as_slice() {
        ["-c", commands] | ["run", "-c", commands] => exec_commands("-c", commands),
        ["-c", ..] => {
            eprintln!("usage: lsl-harness -c <commands>");
            process::exit(1);
        }
        ["run", path] => run_scenario(path),
        ["run", ..] => {
            eprintln!("usage: lsl-harness run <scenario>");
            process::exit(1);
        }
        [other, ..] => {
            eprintln!("unknown subcommand: {}", other);
            eprintln!("usage: lsl-harness [-c <commands> | run <scenario>]");
            process::exit(1);
        }
        [] => {
            if io::stdin().is_terminal() {
                print_usage();
                process::exit(1);
            }
            run_pipe();
        }
    }
}

/// Logs go to stderr, filtered by `LSL_HARNESS_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LSL_HARNESS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Pipe mode: one command per stdin line.
fn run_pipe() {
    let stdin = io::stdin();
    let mut runner = Runner::new();
    let mut had_error = false;

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("read error: {}", e);
                process::exit(1);
            }
        };

        let result = runner.exec(&line);

        for out in runner.take_output() {
            println!("{}", out);
        }

        if let Err(e) = result {
            eprintln!("error: {}", e);
            had_error = true;
        }
    }

    if had_error {
        process::exit(1);
    }
}

fn run_scenario(path: &str) {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot read '{}': {}", path, e);
            process::exit(1);
        }
    };
    exec_commands(path, &content);
}

/// Run every line of `content`, reporting errors as `label:line`.
fn exec_commands(label: &str, content: &str) {
    let mut runner = Runner::new();
    let mut had_error = false;

    for (lineno, line) in content.lines().enumerate() {
        let result = runner.exec(line);

        for out in runner.take_output() {
            println!("{}", out);
        }

        if let Err(e) = result {
            eprintln!("{}:{}: error: {}", label, lineno + 1, e);
            had_error = true;
        }
    }

    if had_error {
        process::exit(1);
    }
}

fn print_usage() {
    println!(
        "\
lsl-harness: behavioral test harness for LSL plugin scripts

USAGE:
  lsl-harness run <scenario>         Execute a scenario file
  lsl-harness -c <commands>          Execute commands inline (one per line)
  lsl-harness run -c <commands>      Same, alternate form
  echo <commands> | lsl-harness      Pipe mode

FLAGS:
  -h, --help                         Show this help

ENVIRONMENT:
  LSL_HARNESS_LOG                    Log filter, e.g. debug or lsl_harness=trace

Type 'help' in a scenario for the command list."
    );
}
