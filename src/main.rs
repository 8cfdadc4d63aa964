use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use xs_matrix::{LoadOptions, LoaderConfig, LogSink, MatrixExport, MatrixObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Summary,
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about = "Load a spectral table into a matrix and print it")]
struct Cli {
    /// Source identifier (a path, or relative to the configured root)
    source: String,

    /// JSON loader configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Minimum (or, with --min-cols, exact) row count
    #[arg(long)]
    min_rows: Option<usize>,

    /// Minimum (or, with --min-rows, exact) column count
    #[arg(long)]
    min_cols: Option<usize>,

    /// Keep rows whose first value lies in [LOW, HIGH]
    #[arg(long, num_args = 2, value_names = ["LOW", "HIGH"], allow_negative_numbers = true)]
    range: Option<Vec<f64>>,

    /// Precompute spline second derivatives
    #[arg(long)]
    deriv2: bool,

    /// Reverse rows when the first column is descending
    #[arg(long)]
    reverse: bool,

    #[arg(long, value_enum, default_value_t = Format::Summary)]
    format: Format,
}

impl Cli {
    /// Command line flags override the configuration file.
    fn options(&self, mut options: LoadOptions) -> Result<LoadOptions> {
        if let Some(rows) = self.min_rows {
            options.min_rows = rows;
        }
        if let Some(cols) = self.min_cols {
            options.min_cols = cols;
        }
        if let Some(range) = &self.range {
            let [low, high] = range.as_slice() else {
                bail!("--range takes exactly two values");
            };
            options = options.range(*low, *high);
        }
        options.derivatives |= self.deriv2;
        options.reverse |= self.reverse;
        Ok(options)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoaderConfig::from_json_file(path)?,
        None => LoaderConfig::default(),
    };
    let options = cli.options(config.options)?;

    let sink = LogSink;
    let loader = config.loader().with_sink(&sink);
    let mut matrix = MatrixObject::new();
    loader
        .load(&cli.source, &mut matrix, &options)
        .with_context(|| format!("loading {}", cli.source))?;

    log::info!(
        "Loaded {} x {} matrix from {}",
        matrix.row_count(),
        matrix.col_count(),
        cli.source
    );

    match cli.format {
        Format::Summary => print_summary(&matrix),
        Format::Csv => write_csv(&matrix)?,
        Format::Json => {
            let export = MatrixExport::from(&matrix);
            serde_json::to_writer_pretty(io::stdout().lock(), &export).context("writing JSON")?;
            println!();
        }
    }
    Ok(())
}

fn print_summary(matrix: &MatrixObject) {
    println!("rows:        {}", matrix.row_count());
    println!("columns:     {}", matrix.col_count());
    if let Some(x) = matrix.reference() {
        if let (Some(first), Some(last)) = (x.first(), x.last()) {
            println!("reference:   {first} .. {last}");
        }
    }
    println!("derivatives: {}", matrix.has_derivatives());
}

/// One line per row: the data columns, then the second derivatives.
fn write_csv(matrix: &MatrixObject) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(io::stdout().lock());

    let cols = matrix.cols();
    let dependents = || cols.indices().skip(1);
    let mut header: Vec<String> = cols.indices().map(|c| format!("c{c}")).collect();
    if matrix.has_derivatives() {
        header.extend(dependents().map(|c| format!("d2_c{c}")));
    }
    writer.write_record(&header).context("writing CSV header")?;

    for r in matrix.rows().indices() {
        let mut record: Vec<String> = cols
            .indices()
            .filter_map(|c| matrix.get(c, r))
            .map(|v| v.to_string())
            .collect();
        record.extend(
            dependents()
                .filter_map(|c| matrix.derivative(c, r))
                .map(|v| v.to_string()),
        );
        writer.write_record(&record).with_context(|| format!("writing CSV row {r}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}
