use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pdf_manual::{compose_to_file, ComposerConfig};

mod content;
mod manual;

use content::ContentFile;

/// Renders titled sections into a paginated PDF manual.
///
/// Fonts are looked up in `--fonts-dir`, `PDF_MANUAL_FONTS_DIR`, `assets/fonts` next to the binary
/// or in the crate sources, and finally among common system fonts.
#[derive(Parser)]
#[command(author, version, about = "Render a PDF manual from ordered sections")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the bundled rust_orm_gen manual, or the sections of a content file.
    Render(RenderArgs),

    /// Print the bundled manual as a TOML content file.
    #[command(name = "dump-content", aliases = ["dump_content", "dump"])]
    DumpContent,
}

#[derive(Args)]
struct RenderArgs {
    /// TOML file with `header`, optional `output` and `[[sections]]` entries.
    #[arg(long, value_name = "FILE")]
    content: Option<PathBuf>,

    /// Destination of the rendered PDF.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Overrides the header printed at the top of every page.
    #[arg(long, value_name = "TEXT")]
    header: Option<String>,

    /// Directory holding Roboto-{Regular,Bold,Italic,BoldItalic}.ttf.
    #[arg(long, value_name = "DIR")]
    fonts_dir: Option<PathBuf>,

    /// Print "Page N" at the bottom of every page.
    #[arg(long)]
    page_numbers: bool,

    /// Add a PDF outline with one entry per section (requires the `bookmarks` feature).
    #[arg(long)]
    bookmarks: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => render(args),
        Commands::DumpContent => dump_content(),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn render(args: RenderArgs) -> Result<(), Box<dyn Error>> {
    let mut content = match &args.content {
        Some(path) => ContentFile::load(path)?,
        None => ContentFile {
            document: manual::document(),
            output: Some(PathBuf::from(manual::DEFAULT_OUTPUT)),
        },
    };

    if let Some(header) = args.header {
        content.document = pdf_manual::Document::new(header)
            .with_sections(content.document.sections().iter().cloned());
    }

    let output = args
        .output
        .or_else(|| content.output.clone())
        .unwrap_or_else(|| PathBuf::from(manual::DEFAULT_OUTPUT));

    let config = ComposerConfig::new()
        .with_fonts_dir(args.fonts_dir)
        .with_page_numbers(args.page_numbers)
        .with_bookmarks(args.bookmarks);

    let pdf = compose_to_file(&content.document, config, &output)?;
    println!(
        "Generated {} ({} sections, {} pages, {} bytes)",
        output.display(),
        content.sections().len(),
        pdf.page_count,
        pdf.bytes.len()
    );
    Ok(())
}

fn dump_content() -> Result<(), Box<dyn Error>> {
    let content = ContentFile::new(manual::document());
    print!("{}", content.to_toml()?);
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_flags_parse() {
        let cli = Cli::try_parse_from([
            "pdf-manual",
            "render",
            "--output",
            "out.pdf",
            "--header",
            "Doc",
            "--page-numbers",
        ])
        .expect("parse");

        let Commands::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert_eq!(args.output, Some(PathBuf::from("out.pdf")));
        assert_eq!(args.header.as_deref(), Some("Doc"));
        assert!(args.page_numbers);
        assert!(!args.bookmarks);
        assert!(args.content.is_none());
    }
}
