use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use opgraph::{
    demo,
    diagnostics::{CompileResult, DEFAULT_MAX_ERRORS, Diagnostic, DiagnosticsAggregator},
    logging::{LogFormat, configure_global_logger},
    object::{ClassDef, ClassGraph, compile_classes},
    scalar::Link,
};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Demo {
    /// The versioned `/app/example` counter.
    Example,
    /// The two `/app/balance` clusters calling each other.
    Balance,
    /// A cluster persisting a table.
    Table,
    /// A standalone table transaction.
    Transaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => tracing::Level::ERROR,
            Level::Warn => tracing::Level::WARN,
            Level::Info => tracing::Level::INFO,
            Level::Debug => tracing::Level::DEBUG,
            Level::Trace => tracing::Level::TRACE,
        }
    }
}

/// Compile the bundled clusters to their op-graph wire form.
#[derive(Debug, Parser)]
#[command(name = "opgraph")]
struct Arguments {
    /// Which bundled definition to compile.
    #[arg(value_enum, default_value = "example")]
    demo: Demo,
    /// Host serving the demo clusters. Balance clusters use this port and the next one.
    #[arg(long, env = "OPGRAPH_HOST", default_value = demo::DEFAULT_HOST)]
    host: String,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
    /// Print the SHA-256 fingerprint of each class instead of its JSON.
    #[arg(long)]
    fingerprint: bool,
    /// Maximum number of errors to render.
    #[arg(long, default_value_t = DEFAULT_MAX_ERRORS)]
    max_errors: usize,
    /// Default log level; `OPGRAPH_LOG` directives take precedence.
    #[arg(long, value_enum, default_value = "warn")]
    log_level: Level,
    #[arg(long, value_enum, default_value = "human-readable")]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Arguments::parse();
    configure_global_logger(args.log_level.into(), args.log_format);

    match run(&args) {
        Ok(diagnostics) if diagnostics.is_empty() => ExitCode::SUCCESS,
        Ok(diagnostics) => {
            let report = DiagnosticsAggregator::new(&diagnostics)
                .with_max_errors(Some(args.max_errors))
                .with_color(std::env::var_os("NO_COLOR").is_none())
                .report();
            eprintln!("{}", report.rendered);
            ExitCode::FAILURE
        }
        Err(diagnostic) => {
            eprintln!("{}", diagnostic.render());
            ExitCode::FAILURE
        }
    }
}

/// Returns the diagnostics of every class that failed to compile.
fn run(args: &Arguments) -> CompileResult<Vec<Diagnostic>> {
    let host = Link::parse(&args.host)?;
    info!(demo = ?args.demo, host = %host, "compiling");

    let classes: Vec<ClassDef> = match args.demo {
        Demo::Example => vec![demo::example_cluster()?],
        Demo::Balance => {
            let (left, right) = demo::balance_clusters(&host)?;
            vec![left, right]
        }
        Demo::Table => vec![demo::table_cluster(&host)?],
        Demo::Transaction => {
            let context = demo::table_transaction(&[("one", 1), ("eleven", 11), ("twelve", 12)])?;
            let json = context.compile()?;
            print_json(&json, args.pretty);
            return Ok(Vec::new());
        }
    };

    let mut diagnostics = Vec::new();
    for result in compile_classes(&classes) {
        match result {
            Ok(graph) => print_class(&graph, args)?,
            Err(errors) => diagnostics.extend(errors),
        }
    }

    Ok(diagnostics)
}

fn print_class(graph: &ClassGraph, args: &Arguments) -> CompileResult<()> {
    if args.fingerprint {
        println!("{}  {}", graph.fingerprint()?, graph.link());
    } else {
        print_json(&graph.to_json()?, args.pretty);
    }
    Ok(())
}

fn print_json(json: &serde_json::Value, pretty: bool) {
    if pretty {
        println!("{:#}", json);
    } else {
        println!("{}", json);
    }
}
