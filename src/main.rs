use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use chordchart::{parse_steps, ChartEngine, ChartError, EngineConfig, NashvilleMode};
use log::LevelFilter;

const USAGE: &str = "\
Usage: chordchart [--config <engine.yaml>] <command> [options] <input>

Commands:
  transpose <steps> <input>    Transpose for display (inline in place, above-line aligned)
  visual <steps> <input>       Transpose an above-line chart, keeping chord columns
  to-above <input>             Convert inline [G]chords to chords above lyrics
  to-inline <input>            Convert chords above lyrics to inline [G]chords
  normalize [--no-promote] <input>
                               Add missing metadata and the default arrangement line
  nashville <numbers|chords|combined> [--key <key>] <input>
                               Show chords as Nashville numbers
  classify <input>             Print the classified lines as JSON
  direction <input>            Print ltr or rtl

<input> is a file path, or - for standard input.
Logging is controlled with RUST_LOG.";

fn usage() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}

fn main() {
    let mut log_builder = env_logger::builder();
    if env::var("RUST_LOG").is_err() {
        log_builder.filter_level(LevelFilter::Warn);
    }
    log_builder.init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), ChartError> {
    let mut args = args;

    // Global flags
    let mut config = EngineConfig::default();
    if args.first().map(String::as_str) == Some("--config") {
        let Some(path) = args.get(1) else { usage() };
        config = EngineConfig::from_yaml(&read_input(path)?)?;
        args = &args[2..];
    }
    let engine = ChartEngine::new(config);

    let Some((command, rest)) = args.split_first() else {
        usage()
    };

    let output = match (command.as_str(), rest) {
        ("transpose", [steps, input]) => {
            engine.transpose_for_display(&read_input(input)?, parse_steps(steps)?)
        }
        ("visual", [steps, input]) => {
            engine.transpose_visual(&read_input(input)?, parse_steps(steps)?)
        }
        ("to-above", [input]) => engine.to_above_line(&read_input(input)?),
        ("to-inline", [input]) => engine.to_inline(&read_input(input)?),
        ("normalize", [flag, input]) if flag == "--no-promote" => {
            normalize(&engine, &read_input(input)?, false)
        }
        ("normalize", [input]) => normalize(&engine, &read_input(input)?, true),
        ("nashville", [mode, input]) => {
            engine.nashville(&read_input(input)?, None, parse_mode(mode))
        }
        ("nashville", [mode, flag, key, input]) if flag == "--key" => {
            engine.nashville(&read_input(input)?, Some(key.as_str()), parse_mode(mode))
        }
        ("classify", [input]) => {
            let doc = engine.parse(&read_input(input)?);
            let records: Vec<_> = doc.records().collect();
            serde_json::to_string_pretty(&serde_json::json!({
                "header": doc.header,
                "lines": records,
            }))
            .map_err(|e| ChartError::Io {
                path: input.clone(),
                message: e.to_string(),
            })?
        }
        ("direction", [input]) => engine.direction(&read_input(input)?).to_string(),
        _ => usage(),
    };

    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn normalize(engine: &ChartEngine, text: &str, promote_sections: bool) -> String {
    let report = engine.normalize(text, promote_sections);
    for notice in &report.notices {
        log::info!("{}", notice);
    }
    report.text
}

fn parse_mode(mode: &str) -> NashvilleMode {
    match NashvilleMode::from_str(mode) {
        Some(mode) => mode,
        None => {
            eprintln!("Unknown Nashville mode '{}' (expected numbers, chords or combined)", mode);
            process::exit(1);
        }
    }
}

fn read_input(path: &str) -> Result<String, ChartError> {
    let io_error = |e: io::Error| ChartError::Io {
        path: path.to_string(),
        message: e.to_string(),
    };
    if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map_err(io_error)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(io_error)
    }
}
