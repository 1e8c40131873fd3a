use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::PathBuf,
    process::ExitCode,
    sync::atomic::Ordering,
    time::{Duration, Instant},
};

use clap::Parser;
use pyrite::{
    Error, Interpreter, StartRule, build_ast,
    interpreter::{cst::Cst, repl::Repl},
    parse, tokenize,
};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// pyrite runs scripts written in a small, indentation-structured language,
/// or starts an interactive shell when no script is given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the script file.
    file: Option<PathBuf>,

    /// Program passed in as a string.
    #[arg(short = 'c', value_name = "PROGRAM")]
    command: Option<String>,

    /// Print the token stream before running.
    #[arg(long)]
    tokens: bool,

    /// Print the flattened syntax tree before running.
    #[arg(long)]
    cst: bool,

    /// Parse and build the input without evaluating it.
    #[arg(long)]
    parse_only: bool,

    /// Print the time spent in every phase to stderr.
    #[arg(long)]
    timings: bool,

    /// Don't print the greeting on interactive startup.
    #[arg(short)]
    quiet: bool,

    /// Force the interactive shell even if stdin is not a terminal.
    #[arg(short)]
    interactive: bool,
}

#[derive(Debug, Default)]
struct Timings {
    lexing:     Duration,
    parsing:    Duration,
    building:   Duration,
    evaluating: Duration,
}

impl Timings {
    fn report(&self, total: Duration) {
        let phases = [("Lexing", self.lexing),
                      ("Parsing", self.parsing),
                      ("Building an AST", self.building),
                      ("Evaluating", self.evaluating),
                      ("Total time", total)];
        eprintln!("{}", "#".repeat(80));
        for (name, elapsed) in phases {
            eprintln!("{name}: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                  EnvFilter::new("warn")
                                              }))
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();
    let interactive = args.interactive || io::stdin().is_terminal();

    if args.file.is_none() && args.command.is_none() && interactive {
        return shell(&args);
    }

    let source = match read_source(&args) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    match run(&args, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn shell(args: &Args) -> ExitCode {
    let interpreter = Interpreter::new();
    let interrupt = interpreter.interrupt_flag();
    if let Err(e) = ctrlc::set_handler(move || interrupt.store(true, Ordering::SeqCst)) {
        warn!(error = %e, "Ctrl-C will terminate the shell");
    }

    let stdin = io::stdin();
    let mut repl = Repl::new(stdin.lock(), io::stdout()).with_interpreter(interpreter)
                                                        .show_cst(args.cst)
                                                        .parse_only(args.parse_only);
    if !args.quiet && let Err(e) = repl.greet() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    match repl.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn read_source(args: &Args) -> Result<String, String> {
    let mut source = if let Some(program) = &args.command {
        program.clone()
    } else if let Some(path) = &args.file {
        fs::read_to_string(path).map_err(|e| {
                                    format!("Failed to read the input file '{}': {e}",
                                            path.display())
                                })?
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)
                   .map_err(|e| format!("Failed to read standard input: {e}"))?;
        buffer
    };
    source.push('\n');
    Ok(source)
}

fn run(args: &Args, source: &str) -> Result<(), Error> {
    let started = Instant::now();
    let mut timings = Timings::default();

    let phase = Instant::now();
    let tokens = tokenize(source)?;
    timings.lexing = phase.elapsed();
    if args.tokens {
        for token in &tokens {
            println!("{token}");
        }
    }

    let phase = Instant::now();
    let tree = parse(&tokens, StartRule::Program)?;
    timings.parsing = phase.elapsed();
    if args.cst {
        print!("{}", Cst::flatten(&tree));
    }

    let phase = Instant::now();
    let unit = build_ast(&tree, StartRule::Program)?;
    timings.building = phase.elapsed();

    if !args.parse_only {
        let phase = Instant::now();
        Interpreter::new().run(&unit)?;
        timings.evaluating = phase.elapsed();
    }

    debug!(elapsed = ?started.elapsed(), "finished");
    if args.timings {
        timings.report(started.elapsed());
    }
    Ok(())
}
