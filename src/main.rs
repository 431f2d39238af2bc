use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use minidocx::notice::{default_output_path, format_size_kb, NoticeDocument};
use minidocx::{Document, DocxWriter, Package};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "minidocx")]
#[command(about = "Write minimal Word documents from plain text")]
#[command(version)]
struct Cli {
    /// Log debug output (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write text as a .docx file, one paragraph per line
    Write {
        /// Heading placed above the text
        #[arg(short, long, default_value = "")]
        title: String,

        /// Text file to read, or '-' for stdin
        #[arg(short, long, default_value = "-")]
        input: String,

        /// Destination .docx file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Write a placeholder document describing a file that was not converted
    Notice {
        /// The source file the document stands in for
        source: PathBuf,

        /// Destination .docx file (defaults to the source path with .docx)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the parts of a .docx file and check the minimal package layout
    Inspect {
        /// The .docx file to inspect
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli.command) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Write {
            title,
            input,
            output,
        } => {
            let body = read_input(&input)?;
            DocxWriter::new()
                .write(&title, &body, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            report_written(&output)
        }
        Command::Notice { source, output } => {
            let output = output.unwrap_or_else(|| default_output_path(&source));
            if output == source {
                bail!(
                    "Refusing to overwrite the source file {}",
                    source.display()
                );
            }

            let notice = NoticeDocument::for_source(&source)?;
            notice
                .write(&DocxWriter::new(), &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            report_written(&output)
        }
        Command::Inspect { file } => inspect(&file),
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read text from stdin")?;
        Ok(body)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

fn report_written(path: &Path) -> Result<()> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    info!("Created {} ({})", path.display(), format_size_kb(size));
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let package =
        Package::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    println!("{}", path.display());
    for (uri, part) in package.parts() {
        println!(
            "  {} ({}) - {} bytes",
            uri,
            part.content_type(),
            part.data().len()
        );
    }

    match package.verify_minimal() {
        Ok(()) => println!("layout: minimal package OK"),
        Err(e) => println!("layout: {}", e),
    }

    let doc = Document::from_package(&package)?;
    if let Some(title) = doc.title() {
        println!("title: {}", title);
    }
    println!("paragraphs: {}", doc.paragraph_count());

    let size = std::fs::metadata(path)?.len();
    println!("size: {}", format_size_kb(size));
    Ok(())
}
