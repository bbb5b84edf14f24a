use anyhow::Result;
use clap::Parser;
use std::io::{self, BufWriter};
use std::process::ExitCode;

use xq::config::{parse_namespace_binding, Config};
use xq::file::loader::load_xml_from_stdin;
use xq::query::{self, Mode};

/// xq - Run XPath queries against an XML document from stdin
#[derive(Parser, Debug)]
#[command(name = "xq")]
#[command(version)]
#[command(about = "Run XPath queries against an XML document from stdin", long_about = None)]
struct Cli {
    /// Search the XML for matching elements or attributes using XPath
    #[arg(short, long, value_name = "EXPR")]
    find: Option<String>,

    /// Compile and run an XPath expression over the XML document
    #[arg(short, long, value_name = "EXPR")]
    exec: Option<String>,

    /// Bind a namespace prefix for use in expressions (repeatable)
    #[arg(
        short = 'n',
        long = "namespace",
        value_name = "PREFIX=URI",
        value_parser = parse_namespace_binding
    )]
    namespaces: Vec<(String, String)>,
}

const EXIT_FAILURE: u8 = 1;

/// Sets up `env_logger` on stderr, filtered by `XQ_LOG` (default: warn).
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("XQ_LOG", "warn"))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    init_logger();

    // clap exits with 2 on usage errors; every failure here is 1.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // If stderr is gone there is nowhere left to report to.
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    // Flags are checked before touching stdin so usage errors never block on input.
    let mode = Mode::from_flags(cli.find.as_deref(), cli.exec.as_deref())?;

    let config = Config::load().with_cli_namespaces(cli.namespaces);

    let Some(package) = load_xml_from_stdin()? else {
        return Ok(());
    };
    let document = package.as_document();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    query::run(&mode, &document, &config.namespaces, &mut out)
}
