//! mc2l CLI - MathCad S-expression to LaTeX translator

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use log::{debug, info};
#[cfg(feature = "cli")]
use mcad2tex::{
    diagnostics::{check_mathcad, format_diagnostics},
    mathcad_to_latex_with_diagnostics, ConversionError, ConversionResult, ConversionWarning,
    TranslateOptions,
};
#[cfg(feature = "cli")]
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, BufRead, IsTerminal, Write};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "mc2l")]
#[command(version)]
#[command(about = "Translate MathCad S-expressions to LaTeX math", long_about = None)]
struct Cli {
    /// Expression to translate (starts an interactive session if omitted)
    expression: Option<String>,

    /// Translate a file line by line
    #[arg(long, conflicts_with = "expression")]
    file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    /// Only the six core rules, no extended forms
    #[arg(long)]
    classic: bool,

    /// Keep text around a matched form instead of dropping it
    #[arg(long)]
    keep_context: bool,

    /// Run the LaTeX refine pass on the output
    #[arg(long)]
    refine: bool,

    /// Check mode - analyze input for potential issues without translating
    #[arg(long)]
    check: bool,

    /// Strict mode: exit with error if any translation warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[cfg(feature = "cli")]
impl Cli {
    fn options(&self) -> TranslateOptions {
        let mut options = if self.classic {
            TranslateOptions::classic()
        } else {
            TranslateOptions::default()
        };
        options.preserve_context = self.keep_context;
        options.refine = self.refine;
        options
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };
    if let Err(e) = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )]) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

#[cfg(feature = "cli")]
fn run(cli: &Cli) -> ConversionResult<()> {
    let options = cli.options();

    if let Some(ref path) = cli.file {
        info!("translating file {}", path);
        let input = fs::read_to_string(path)?;
        return run_batch(cli, &input, &options);
    }

    match cli.expression {
        Some(ref expression) => run_batch(cli, expression, &options),
        None => run_interactive(cli, &options),
    }
}

/// Translate every line of `input` and write the results in one go
#[cfg(feature = "cli")]
fn run_batch(cli: &Cli, input: &str, options: &TranslateOptions) -> ConversionResult<()> {
    if cli.check {
        let result = check_mathcad(input);
        println!("{}", format_diagnostics(&result, !cli.no_color));
        if result.has_errors() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut lines = Vec::new();
    let mut warnings: Vec<ConversionWarning> = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let converted = mathcad_to_latex_with_diagnostics(line, options);
        debug!("line {}: `{}` -> `{}`", index + 1, line, converted.content);
        warnings.extend(converted.warnings.into_iter().map(|w| w.with_line(index + 1)));
        lines.push(converted.content);
    }
    let result = lines.join("\n");

    if !cli.quiet && !warnings.is_empty() {
        print_warnings_to_stderr(&warnings, !cli.no_color);
    }

    if cli.strict && !warnings.is_empty() {
        return Err(ConversionError::StrictMode {
            warnings: warnings.len(),
        });
    }

    match cli.output {
        Some(ref path) => {
            let mut file = fs::File::create(path)?;
            writeln!(file, "{}", result)?;
            if warnings.is_empty() {
                eprintln!("✓ Output written to: {}", path);
            } else {
                eprintln!("⚠ Output written to: {} ({} warning(s))", path, warnings.len());
            }
        }
        None => println!("{}", result),
    }

    Ok(())
}

/// Read expressions from stdin until `exit`, `quit` or end of input
#[cfg(feature = "cli")]
fn run_interactive(cli: &Cli, options: &TranslateOptions) -> ConversionResult<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut out: Box<dyn Write> = match cli.output {
        Some(ref path) => Box::new(fs::File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut warning_count = 0;

    if interactive {
        eprintln!("mc2l {} - type an expression, `exit` to quit", env!("CARGO_PKG_VERSION"));
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("mc2l> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }

        if cli.check {
            let result = check_mathcad(&line);
            writeln!(out, "{}", format_diagnostics(&result, !cli.no_color))?;
            continue;
        }

        let converted = mathcad_to_latex_with_diagnostics(&line, options);
        if !cli.quiet && converted.has_warnings() {
            print_warnings_to_stderr(&converted.warnings, !cli.no_color);
        }
        warning_count += converted.warnings.len();
        writeln!(out, "{}", converted.content)?;
    }
    out.flush()?;

    if cli.strict && warning_count > 0 {
        return Err(ConversionError::StrictMode {
            warnings: warning_count,
        });
    }
    Ok(())
}

/// Print warnings to stderr with optional color coding
#[cfg(feature = "cli")]
fn print_warnings_to_stderr(warnings: &[ConversionWarning], use_color: bool) {
    let color = if use_color { "\x1b[33m" } else { "" };
    let reset = if use_color { "\x1b[0m" } else { "" };

    for warning in warnings {
        match warning.line {
            Some(line) => eprintln!(
                "  {}[{}]{} line {}: {}",
                color, warning.kind, reset, line, warning.message
            ),
            None => eprintln!("  {}[{}]{} {}", color, warning.kind, reset, warning.message),
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install mcad2tex --features cli");
    eprintln!("  mc2l [OPTIONS] [EXPRESSION]");
}
