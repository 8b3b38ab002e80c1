use anyhow::{anyhow, Result};
use routemap::cli::{parse_args, Commands};
use routemap::config::{load_config, load_config_from, RoutemapConfig};
use routemap::declarations::extract_declarations;
use routemap::detection::detect_with_config;
use routemap::errors::ScanError;
use routemap::io::{create_route_writer, write_declarations, OutputFormat};
use routemap::observability::init_tracing;
use routemap::pipeline::{scan_declarations, stream_routes, RouteStream};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.verbosity);

    let outcome = match cli.command {
        Commands::Detect { path } => handle_detect(&path),
        Commands::Routes {
            source,
            format,
            output,
            max_files,
            branch,
        } => handle_routes(&source, format, output, max_files, branch),
        Commands::Declarations {
            source,
            format,
            output,
        } => handle_declarations(&source, format, output),
    };

    if let Err(err) = outcome {
        report_failure(&err);
        std::process::exit(1);
    }
    Ok(())
}

/// Print `error[<kind>]: <message>`; only the kind and message cross this line.
fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<ScanError>() {
        Some(scan_error) => {
            let report = scan_error.report();
            eprintln!("error[{}]: {}", report.kind, report.message);
        }
        None => eprintln!("error: {err:#}"),
    }
}

fn local_directory(source: &str) -> Option<&Path> {
    let path = Path::new(source);
    path.is_dir().then_some(path)
}

fn config_for(source: &str) -> RoutemapConfig {
    match local_directory(source) {
        Some(dir) => load_config_from(dir),
        None => load_config(),
    }
}

fn open_output(output: Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

fn handle_detect(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ScanError::invalid_input(format!("{} is not a directory", path.display())).into());
    }
    let config = load_config_from(path);
    let detection = detect_with_config(path, &config.scan);
    println!("{}", serde_json::to_string_pretty(&detection)?);
    Ok(())
}

fn handle_routes(
    source: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
    max_files: Option<usize>,
    branch: Option<String>,
) -> Result<()> {
    let mut config = config_for(source);
    if let Some(max_files) = max_files {
        if max_files == 0 {
            return Err(ScanError::invalid_input("--max-files must be greater than zero").into());
        }
        config.scan.max_files = max_files;
    }
    if branch.is_some() {
        config.workspace.branch = branch;
    }

    let mut stream = match local_directory(source) {
        Some(dir) => RouteStream::from_directory(dir, config.scan.clone()),
        None => stream_routes(source, &config)?,
    };

    let mut writer = create_route_writer(format, open_output(output)?);
    for route in stream.by_ref() {
        writer.write_route(&route)?;
    }
    let summary = stream
        .summary()
        .cloned()
        .ok_or_else(|| anyhow!("route scan stopped before completing"))?;
    writer.finish(&summary)?;
    Ok(())
}

fn handle_declarations(source: &str, format: OutputFormat, output: Option<PathBuf>) -> Result<()> {
    let config = config_for(source);
    let scan = match local_directory(source) {
        Some(dir) => extract_declarations(dir, &config.scan),
        None => scan_declarations(source, &config)?,
    };
    let mut sink = open_output(output)?;
    write_declarations(format, &mut sink, &scan)?;
    sink.flush()?;
    Ok(())
}
