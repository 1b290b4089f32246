use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use page_translator::env::{self, EnvVar};
use page_translator::html::{encode_html, get_body, html_to_dom, inner_html, serialize_document};
use page_translator::translation::{ConfigManager, PageTranslator, TranslationResult};

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

#[derive(Parser, Debug)]
#[command(
    name = "page-translator",
    version,
    about = "Translate the text of an HTML document in place"
)]
struct Cli {
    /// Source language code (e.g. en)
    #[arg(short, long, required_unless_present = "env_docs")]
    source: Option<String>,

    /// Target language code (e.g. hi)
    #[arg(short, long, required_unless_present = "env_docs")]
    target: Option<String>,

    /// Configuration file (TOML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Character encoding of the input document
    #[arg(short = 'E', long, default_value = "utf-8")]
    encoding: String,

    /// Print only the translated <body> contents
    #[arg(long)]
    body_only: bool,

    /// List supported environment variables and exit
    #[arg(long)]
    env_docs: bool,

    /// Input HTML file; reads stdin when omitted or "-"
    input: Option<PathBuf>,
}

fn init_logging() {
    let level = env::core::LogLevel::get().unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: Option<&PathBuf>) -> io::Result<Vec<u8>> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read(path),
        _ => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
    }
}

async fn run(cli: &Cli, source: &str, target: &str) -> TranslationResult<Vec<u8>> {
    let manager = ConfigManager::new(cli.config.as_deref())?;
    let translator = PageTranslator::new(manager.into_config())?;

    let data = read_input(cli.input.as_ref())?;
    let dom = html_to_dom(&data, &cli.encoding);
    let body = get_body(&dom).unwrap_or_else(|| dom.document.clone());

    let body = translator.translate_dom(body, source, target).await?;

    let snapshot = translator.get_stats().snapshot();
    tracing::info!(
        "{} 个唯一文本, 写入 {} 个节点",
        snapshot.units_collected,
        snapshot.nodes_written
    );

    if cli.body_only {
        Ok(encode_html(&inner_html(&body)?, &cli.encoding))
    } else {
        Ok(serialize_document(dom, &cli.encoding)?)
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.env_docs {
        print!("{}", env::generate_env_docs());
        return;
    }

    init_logging();

    let (Some(source), Some(target)) = (cli.source.as_deref(), cli.target.as_deref()) else {
        eprintln!("Both --source and --target are required");
        process::exit(2);
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}Error: {}{}", ANSI_COLOR_RED, e, ANSI_COLOR_RESET);
            process::exit(1);
        }
    };

    let output = match runtime.block_on(run(&cli, source, target)) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}Error: {}{}", ANSI_COLOR_RED, e, ANSI_COLOR_RESET);
            process::exit(1);
        }
    };

    let written = match &cli.output {
        Some(path) => fs::write(path, &output),
        None => io::stdout().write_all(&output),
    };

    if let Err(e) = written {
        eprintln!("{}Error: {}{}", ANSI_COLOR_RED, e, ANSI_COLOR_RESET);
        process::exit(1);
    }
}
