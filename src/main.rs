//! # Fileconvert - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing`
//! - Caricamento della configurazione e override dai flag CLI
//! - Dispatch verso i converter e gli extractor
//!
//! ## Flusso di esecuzione:
//! 1. Parsa il subcommand (audio, video, image, extract-text,
//!    extract-images, batch) e i flag globali
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose)
//! 3. Carica gli eventuali default da file JSON e applica gli override
//! 4. Verifica le dipendenze esterne dove servono (ffmpeg)
//! 5. Esegue l'operazione richiesta e stampa il report (testo o JSON)
//!
//! ## Esempio di utilizzo:
//! ```bash
//! fileconvert image photo.heic photo.jpg --quality 40 --report
//! fileconvert batch ./recordings --ext wav --to mp3
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use image::DynamicImage;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use fileconvert::format::{self, MediaKind};
use fileconvert::paths::{find_files_under, replace_ext};
use fileconvert::size::human_size;
use fileconvert::{
    extract_images_from_document, extract_images_from_pdf, extract_text_from_document,
    extract_text_from_pdf, AudioConverter, Config, ConversionReport, ConvertError,
    ImageConverter, VideoConverter,
};

#[derive(Parser)]
#[command(name = "fileconvert")]
#[command(about = "Convert audio/video/image files and extract text and images from documents")]
struct Args {
    #[command(subcommand)]
    command: CliCommand,

    /// Load default parameters from a JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit conversion reports as JSON instead of the human-readable line
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Convert an audio file to another format, adjusting the bitrate
    Audio {
        input: PathBuf,
        output: PathBuf,
        /// Audio bitrate (high: 256k, mid: 160k, low: 96k)
        #[arg(short, long)]
        bitrate: Option<String>,
        /// Print the size report after conversion
        #[arg(short, long)]
        report: bool,
    },
    /// Convert a video file to another format, adjusting resolution and bitrate
    Video {
        input: PathBuf,
        output: PathBuf,
        /// Output resolution as WxH (high: 1920x1080, mid: 1280x720, low: 640x480)
        #[arg(short = 's', long)]
        resolution: Option<String>,
        /// Video bitrate (high: 3000k, mid: 1000k, low: 500k)
        #[arg(short, long)]
        bitrate: Option<String>,
        /// Print the size report after conversion
        #[arg(short, long)]
        report: bool,
    },
    /// Convert an image file to another format, compressing the quality
    Image {
        input: PathBuf,
        output: PathBuf,
        /// Compression quality 0-100 (lossy encoders only)
        #[arg(short, long)]
        quality: Option<u8>,
        /// Copy metadata (GPS location, camera parameters) with exiftool
        #[arg(short, long)]
        keep_metadata: bool,
        /// Suppress best-effort warnings
        #[arg(long)]
        quiet: bool,
        /// Print the size report after conversion
        #[arg(short, long)]
        report: bool,
    },
    /// Extract text from a .docx or .pdf file
    ExtractText {
        input: PathBuf,
        /// Write the text here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract embedded images from a .docx or .pdf file
    ExtractImages {
        input: PathBuf,
        /// Directory that receives the extracted images
        #[arg(short, long)]
        output_dir: PathBuf,
        /// Format for the saved images
        #[arg(short, long, default_value = "png")]
        format: String,
    },
    /// Convert every file with a given extension under a folder
    Batch {
        directory: PathBuf,
        /// Source extension to look for (e.g. wav)
        #[arg(long)]
        ext: String,
        /// Destination extension (e.g. mp3); selects the converter
        #[arg(long)]
        to: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    match args.command {
        CliCommand::Audio {
            input,
            output,
            bitrate,
            report,
        } => {
            if let Some(bitrate) = bitrate {
                config.audio_bitrate = bitrate;
            }
            config.report = report && !args.json;
            config.validate()?;
            AudioConverter::check_dependencies()?;

            let converted = AudioConverter::new(config).convert(&input, &output)?;
            print_json_report(args.json, &converted)?;
        }
        CliCommand::Video {
            input,
            output,
            resolution,
            bitrate,
            report,
        } => {
            if let Some(resolution) = resolution {
                config.video_resolution = resolution;
            }
            if let Some(bitrate) = bitrate {
                config.video_bitrate = bitrate;
            }
            config.report = report && !args.json;
            config.validate()?;
            VideoConverter::check_dependencies()?;

            let converted = VideoConverter::new(config).convert(&input, &output)?;
            print_json_report(args.json, &converted)?;
        }
        CliCommand::Image {
            input,
            output,
            quality,
            keep_metadata,
            quiet,
            report,
        } => {
            if let Some(quality) = quality {
                config.image_quality = quality;
            }
            config.keep_metadata = keep_metadata;
            config.suppress_warnings = quiet;
            config.report = report && !args.json;
            config.validate()?;

            let converted = ImageConverter::new(config).convert(&input, &output)?;
            print_json_report(args.json, &converted)?;
        }
        CliCommand::ExtractText { input, output } => {
            let text = match extractor_kind(&input)? {
                ExtractorKind::Document => {
                    extract_text_from_document(&input, output.as_deref())?
                }
                ExtractorKind::Pdf => extract_text_from_pdf(&input, output.as_deref())?,
            };
            match output {
                Some(path) => info!("Extracted text written to {}", path.display()),
                None => println!("{text}"),
            }
        }
        CliCommand::ExtractImages {
            input,
            output_dir,
            format,
        } => {
            let images = match extractor_kind(&input)? {
                ExtractorKind::Document => extract_images_from_document(&input)?,
                ExtractorKind::Pdf => extract_images_from_pdf(&input)?,
            };
            std::fs::create_dir_all(&output_dir)?;

            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "extracted".to_string());
            for (index, image) in images.iter().enumerate() {
                let path = output_dir.join(format!("{stem}_{index:03}.{format}"));
                save_extracted(image, &path)?;
            }
            info!(
                "Extracted {} images to {}",
                images.len(),
                output_dir.display()
            );
        }
        CliCommand::Batch { directory, ext, to } => {
            run_batch(&directory, &ext, &to, config, args.json)?;
        }
    }

    Ok(())
}

fn print_json_report(json: bool, report: &ConversionReport) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
    }
    Ok(())
}

enum ExtractorKind {
    Document,
    Pdf,
}

fn extractor_kind(input: &Path) -> Result<ExtractorKind> {
    match input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("docx") => Ok(ExtractorKind::Document),
        Some("pdf") => Ok(ExtractorKind::Pdf),
        _ => Err(ConvertError::UnsupportedFormat(format!(
            "cannot extract from {:?}: only .docx and .pdf are supported",
            input
        ))
        .into()),
    }
}

/// Save an extracted image, flattening alpha away when the target format
/// cannot carry it
fn save_extracted(image: &DynamicImage, path: &Path) -> Result<()> {
    let token = format::resolve_format(path)?;
    if image.color().has_alpha() && !format::supports_alpha(&token) {
        DynamicImage::ImageRgb8(image.to_rgb8()).save(path)?;
    } else {
        image.save(path)?;
    }
    Ok(())
}

enum AnyConverter {
    Audio(AudioConverter),
    Video(VideoConverter),
    Image(ImageConverter),
}

impl AnyConverter {
    fn convert(&self, input: &Path, output: &Path) -> fileconvert::Result<ConversionReport> {
        match self {
            AnyConverter::Audio(converter) => converter.convert(input, output),
            AnyConverter::Video(converter) => converter.convert(input, output),
            AnyConverter::Image(converter) => converter.convert(input, output),
        }
    }
}

fn run_batch(directory: &Path, ext: &str, to: &str, config: Config, json: bool) -> Result<()> {
    let source_ext = ext.trim_start_matches('.').to_lowercase();
    let target_ext = to.trim_start_matches('.');

    let kind = format::media_kind(target_ext).ok_or_else(|| {
        anyhow::anyhow!("Cannot infer a converter from the destination extension: {to}")
    })?;
    config.validate()?;

    let converter = match kind {
        MediaKind::Audio => {
            AudioConverter::check_dependencies()?;
            AnyConverter::Audio(AudioConverter::new(config))
        }
        MediaKind::Video => {
            VideoConverter::check_dependencies()?;
            AnyConverter::Video(VideoConverter::new(config))
        }
        MediaKind::Image => AnyConverter::Image(ImageConverter::new(config)),
    };

    let files = find_files_under(directory, |path| {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase() == source_ext)
            .unwrap_or(false)
    });
    if files.is_empty() {
        info!(
            "No .{source_ext} files found under {}",
            directory.display()
        );
        return Ok(());
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut converted = 0usize;
    let mut failed = 0usize;
    let mut source_bytes = 0u64;
    let mut destination_bytes = 0u64;
    let mut reports = Vec::new();

    for file in &files {
        bar.set_message(
            file.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        let output = replace_ext(file, target_ext);
        match converter.convert(file, &output) {
            Ok(report) => {
                converted += 1;
                source_bytes += report.source_bytes;
                destination_bytes += report.destination_bytes;
                if json {
                    reports.push(report.to_json());
                }
            }
            Err(e) => {
                failed += 1;
                warn!("Failed to convert {}: {e}", file.display());
            }
        }
        bar.inc(1);
    }

    bar.finish_with_message(format!("{converted} converted, {failed} failed"));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::Value::Array(reports))?
        );
    } else {
        println!(
            "Converted {converted}/{} files: {} -> {}",
            files.len(),
            human_size(source_bytes),
            human_size(destination_bytes)
        );
    }
    Ok(())
}
