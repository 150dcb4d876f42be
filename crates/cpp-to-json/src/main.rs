use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cpp_to_json::config::LogLevel;
use cpp_to_json::{
    AcceptAll, AllowList, ClangProvider, Error, InputSource, ObtainOptions, Settings, TypePolicy, UnsupportedLog,
    obtain_functions,
};

#[derive(Parser, Debug)]
#[command(name = "cpp-to-json", version, about = "Extract marshalable C++ functions and value types as JSON")]
struct Args {
    /// C++ file to analyze, or inline source text.
    input: String,

    /// Configuration file; defaults to the nearest `cpp-to-json.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only analyze the entry file.
    #[arg(long)]
    no_includes: bool,

    /// Follow only includes whose canonical path matches (from the start).
    #[arg(long = "include", value_name = "REGEX")]
    include_regexes: Vec<String>,

    /// Never follow includes whose canonical path matches (from the start).
    #[arg(long = "exclude", value_name = "REGEX")]
    exclude_regexes: Vec<String>,

    /// Extra include directory for the compiler.
    #[arg(short = 'I', value_name = "DIR")]
    include_paths: Vec<String>,

    #[arg(long)]
    std: Option<String>,

    /// Compiler binary used for the AST dump.
    #[arg(long)]
    clang: Option<String>,

    /// Additional type token the policy accepts.
    #[arg(long = "accept", value_name = "TOKEN")]
    accepted: Vec<String>,

    /// Additional type token the policy ignores.
    #[arg(long = "ignore", value_name = "TOKEN")]
    ignored: Vec<String>,

    /// Accept every type token.
    #[arg(long)]
    accept_all: bool,

    #[arg(long)]
    pretty: bool,

    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let source = InputSource::detect(&args.input);

    let settings = match load_settings(&args, &source) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        },
    };
    init_logging(&args, settings.logging.level);

    match run(&args, source, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn load_settings(
    args: &Args,
    source: &InputSource,
) -> Result<Settings, Error> {
    let mut settings = match (&args.config, source) {
        (Some(path), _) => Settings::load(path)?,
        (None, InputSource::Path(path)) => Settings::discover(path)?,
        (None, InputSource::Text(_)) => Settings::discover(&std::env::current_dir()?)?,
    };

    if args.no_includes {
        settings.traversal.traverse_includes = false;
    }
    settings.traversal.include_regexes.extend(args.include_regexes.iter().cloned());
    settings.traversal.exclude_regexes.extend(args.exclude_regexes.iter().cloned());
    settings.compiler.include_paths.extend(args.include_paths.iter().cloned());
    if let Some(std) = &args.std {
        settings.compiler.std = std.clone();
    }
    if let Some(clang) = &args.clang {
        settings.compiler.clang = clang.clone();
    }
    if args.verbose {
        settings.logging.level = settings.logging.level.max(LogLevel::Debug);
    }
    settings.normalize();
    Ok(settings)
}

fn init_logging(
    args: &Args,
    level: LogLevel,
) {
    let directive = format!("cpp_to_json={}", level.as_directive());

    let file_layer = args.log_file.as_ref().map(|log_path| {
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(Path::new(".")),
            log_path.file_name().unwrap_or(std::ffi::OsStr::new("cpp-to-json.log")),
        );
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(false)
            .with_filter(EnvFilter::new(&directive))
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(&directive));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();
}

fn run(
    args: &Args,
    source: InputSource,
    settings: &Settings,
) -> Result<(), Error> {
    let options = ObtainOptions::from_settings(&settings.traversal)?;
    let mut provider = ClangProvider::new(settings.compiler.clone());
    let policy: Box<dyn TypePolicy> = if args.accept_all {
        Box::new(AcceptAll)
    } else {
        let mut policy = AllowList::standard();
        for token in &args.accepted {
            policy = policy.accept(token.as_str());
        }
        for token in &args.ignored {
            policy = policy.ignore(token.as_str());
        }
        Box::new(policy)
    };
    let mut unsupported = UnsupportedLog::new();

    let extraction = obtain_functions(source, &options, &mut provider, policy.as_ref(), &mut unsupported)?;

    for symbol in &unsupported.symbols {
        let file = symbol.file.as_ref().map_or_else(|| "<input>".to_string(), |file| file.display().to_string());
        match symbol.line {
            Some(line) => warn!("unsupported: {} ({file}:{line})", symbol.name),
            None => warn!("unsupported: {} ({file})", symbol.name),
        }
    }
    if !unsupported.is_empty() {
        info!("{} unsupported symbols left out", unsupported.len());
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&extraction)
    } else {
        serde_json::to_string(&extraction)
    }
    .map_err(|e| std::io::Error::other(e.to_string()))?;
    println!("{json}");
    Ok(())
}
