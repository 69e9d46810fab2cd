use anyhow::Result;
use clap::{Parser, Subcommand};
use pdf_margin_notes::{PrintableOptions, PrintableStatistics};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdft", about = "PDF tools CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn annotations into printable margin notes
    Printable {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file (default: <stem>.printable.pdf next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON options file; flags given on the command line take precedence
        #[arg(long)]
        config: Option<PathBuf>,

        /// Extra page width as a fraction of the original width
        #[arg(long)]
        expand_ratio: Option<f32>,

        /// Vertical gap between notes in points
        #[arg(long)]
        padding: Option<f32>,

        /// Note font size in points
        #[arg(long)]
        font_size: Option<f32>,

        /// Connector stub length in points
        #[arg(long)]
        stub_length: Option<f32>,

        /// Show statistics only, don't write a PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Show the annotations that would become margin notes
    Inspect {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Printable {
            input,
            output,
            config,
            expand_ratio,
            padding,
            font_size,
            stub_length,
            stats_only,
        } => {
            let mut options = match config {
                Some(path) => PrintableOptions::load(&path).await?,
                None => PrintableOptions::default(),
            };
            options.input_file = input;
            if output.is_some() {
                options.output_file = output;
            }
            if let Some(ratio) = expand_ratio {
                options.expand_ratio = ratio;
            }
            if let Some(padding) = padding {
                options.note_padding = padding;
            }
            if let Some(size) = font_size {
                options.font_size = size;
            }
            if let Some(length) = stub_length {
                options.stub_length = length;
            }
            options.validate()?;

            let doc = pdf_margin_notes::load_pdf(&options.input_file).await?;

            // Planning fails fast here, before anything is written
            let plans = pdf_margin_notes::plan_document(&doc, &options)?;
            print_statistics(&pdf_margin_notes::summarize_plans(&plans), false);

            if stats_only {
                return Ok(());
            }

            let converted = pdf_margin_notes::apply_plans(&doc, &plans, &options).await?;
            let output = options.output_path();
            pdf_margin_notes::save_pdf(converted, &output).await?;
            println!("Printable → {}", output.display());
        }

        Commands::Inspect { input } => {
            let options = PrintableOptions::for_file(&input);
            let doc = pdf_margin_notes::load_pdf(&input).await?;
            let stats = pdf_margin_notes::calculate_statistics(&doc, &options)?;
            print_statistics(&stats, true);
        }
    }

    Ok(())
}

fn print_statistics(stats: &PrintableStatistics, detailed: bool) {
    println!("Margin Note Statistics:");
    println!("  Pages: {}", stats.pages);
    println!("  Annotated pages: {}", stats.annotated_pages);
    println!("  Source annotations: {}", stats.source_annotations);
    println!("  Notes to add: {}", stats.notes_added);
    println!("  Connector lines to add: {}", stats.lines_added);

    if !detailed {
        return;
    }

    for page in &stats.per_page {
        println!(
            "  Page {} ({} column detours):",
            page.page_number, page.column_detours
        );
        for annotation in &page.annotations {
            println!(
                "    #{} {} at ({:.1}, {:.1}): {}",
                annotation.index,
                annotation.subtype,
                annotation.anchor.0,
                annotation.anchor.1,
                annotation.preview
            );
        }
    }
}
