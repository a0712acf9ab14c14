use std::{fs::read_to_string, path::PathBuf, process::ExitCode, rc::Rc, time::Instant};

use clap::{ArgAction, Parser};
use log::{info, warn};
use pascal_front::{
    ast::ast::Program, errors::errors::Error, format_error, lexer::lexer::tokenize,
    parser::parser::parse, printer::printer::print_program,
    type_checker::type_checker::type_check,
};

#[derive(Parser)]
#[command(name = "pascal-front", version, about = "Parse and type check Pascal source files")]
struct Args {
    /// Source files, each checked independently
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print inserted casts as `type(expr)`
    #[arg(long)]
    show_casts: bool,

    /// Only report errors, do not print checked programs
    #[arg(long)]
    no_print: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut failures = 0;

    for path in args.files.iter() {
        let file_name = path.display().to_string();

        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                eprintln!("Error: cannot read {}: {}", file_name, error);
                failures += 1;
                continue;
            }
        };

        match check_file(&file_name, &content) {
            Ok(program) => {
                if !args.no_print {
                    print!("{}", print_program(&program, args.show_casts));
                }
            }
            Err(error) => {
                eprint!("{}", format_error(&error, &file_name, &content));
                failures += 1;
            }
        }
    }

    if failures > 0 {
        warn!("{} of {} files failed", failures, args.files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn check_file(file_name: &str, content: &str) -> Result<Program, Error> {
    let start = Instant::now();

    let tokens = tokenize(content.to_string(), Some(file_name.to_string()))?;
    info!("Tokenized {} in {:?}", file_name, start.elapsed());

    let parse_start = Instant::now();
    let mut program = parse(tokens, Rc::new(file_name.to_string()))?;
    info!("Parsed {} in {:?}", file_name, parse_start.elapsed());

    let type_check_start = Instant::now();
    type_check(&mut program)?;
    info!("Type checked {} in {:?}", file_name, type_check_start.elapsed());
    info!("Total time for {}: {:?}", file_name, start.elapsed());

    Ok(program)
}
