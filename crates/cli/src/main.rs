//! CLI tool for importing presentations into normalized slide lists.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deck_core::{FileInfo, ImportOptions, ImportReport, PresentationFormat, SlideLayout};
use deck_ppt::LegacyScraper;
use deck_pptx::PptxImporter;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Import PowerPoint files as normalized slide lists.
#[derive(Parser, Debug)]
#[command(name = "deck-import")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input presentation file(s) (.pptx or .ppt)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: print to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Skip embedding images as data URLs
    #[arg(long)]
    no_media: bool,

    /// Skip media entries larger than this many bytes
    #[arg(long)]
    max_media_bytes: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Serialized slide list with format and degraded flag
    Json,
    /// One line per slide
    Summary,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Summary => "txt",
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let options = ImportOptions::new()
        .with_embed_media(!args.no_media)
        .with_max_media_bytes(args.max_media_bytes);

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        match process_file(input_path, &args, &options) {
            Ok(output) => match args.output.as_ref() {
                Some(dir) => {
                    let output_path = get_output_path(input_path, dir, args.format)?;
                    write_output(&output_path, &output)?;
                    if args.verbose {
                        eprintln!("Written to: {}", output_path.display());
                    }
                }
                None => print!("{}", output),
            },
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Import a single presentation and render it in the requested format.
fn process_file(input_path: &Path, args: &Args, options: &ImportOptions) -> Result<String> {
    let data = std::fs::read(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    let name = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");
    let file = FileInfo::new(name, data.len() as u64);

    let report = import(&data, &file, options);

    if args.verbose {
        eprintln!(
            "  Found {} slides ({}{})",
            report.slides.len(),
            report.format.as_str(),
            if report.degraded { ", degraded" } else { "" }
        );
    }

    match args.format {
        OutputFormat::Json => {
            let mut json = if args.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            }
            .context("Failed to serialize slides")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Summary => Ok(format_summary(&report)),
    }
}

/// Run the importer matching the detected format.
fn import(data: &[u8], file: &FileInfo, options: &ImportOptions) -> ImportReport {
    match PresentationFormat::detect(data, file) {
        PresentationFormat::Pptx => {
            log::debug!("Importing as PPTX");
            PptxImporter::with_options(options.clone()).import_report(data, file)
        }
        PresentationFormat::Ppt => {
            log::debug!("Importing as legacy PPT");
            LegacyScraper::new().import_report(data, file)
        }
    }
}

/// One tab-separated line per slide: id, layout, title, background.
fn format_summary(report: &ImportReport) -> String {
    let mut output = String::new();
    for slide in &report.slides {
        let layout = match slide.layout {
            SlideLayout::Title => "title",
            SlideLayout::Content => "content",
        };
        output.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            slide.id,
            layout,
            slide.title.replace('\n', " "),
            slide.background.to_css()
        ));
    }
    output
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: &Path, format: OutputFormat) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    Ok(output_dir.join(format!("{}.{}", stem, format.extension())))
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Background, Slide};

    #[test]
    fn test_summary_lines() {
        let mut first = Slide::new(1).with_text_blocks(&["Intro".to_string()]);
        first.background = Background::Gradient(vec!["#000000".into(), "#ffffff".into()]);
        let second = Slide::new(2).with_text_blocks(&[
            "Agenda".to_string(),
            "Today".to_string(),
            "Item".to_string(),
        ]);
        let report = ImportReport {
            format: PresentationFormat::Pptx,
            slides: vec![first, second],
            degraded: false,
        };

        assert_eq!(
            format_summary(&report),
            "1\ttitle\tIntro\tlinear-gradient(180deg, #000000, #ffffff)\n\
             2\tcontent\tAgenda\t#ffffff\n"
        );
    }

    #[test]
    fn test_legacy_bytes_use_scraper() {
        let file = FileInfo::new("old.ppt", 8);
        let report = import(b"Welcome\x01", &file, &ImportOptions::default());
        assert_eq!(report.format, PresentationFormat::Ppt);
        assert_eq!(report.slides[0].title, "Welcome");
    }

    #[test]
    fn test_output_extension_follows_format() {
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Summary.extension(), "txt");
    }
}
