use crate::core::{DeclarationSet, RouteRecord};
use crate::declarations::DeclarationScan;
use crate::extraction::ScanSummary;
use colored::*;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Colored human-readable listing
    Terminal,
    /// One JSON document written when the scan finishes
    Json,
    /// One JSON record per line, written as soon as each route is found
    Jsonl,
}

/// Sink for a stream of route records.
pub trait RouteWriter {
    fn write_route(&mut self, route: &RouteRecord) -> anyhow::Result<()>;
    fn finish(&mut self, summary: &ScanSummary) -> anyhow::Result<()>;
}

pub fn create_route_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn RouteWriter + 'a> {
    match format {
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Jsonl => Box::new(JsonLinesWriter::new(writer)),
    }
}

#[derive(Serialize)]
struct RouteDocument<'a> {
    #[serde(flatten)]
    summary: &'a ScanSummary,
    routes: &'a [RouteRecord],
}

pub struct JsonWriter<W: Write> {
    writer: W,
    routes: Vec<RouteRecord>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            routes: Vec::new(),
        }
    }
}

impl<W: Write> RouteWriter for JsonWriter<W> {
    fn write_route(&mut self, route: &RouteRecord) -> anyhow::Result<()> {
        self.routes.push(route.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> anyhow::Result<()> {
        let document = RouteDocument {
            summary,
            routes: &self.routes,
        };
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

pub struct JsonLinesWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> RouteWriter for JsonLinesWriter<W> {
    fn write_route(&mut self, route: &RouteRecord) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, route)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> RouteWriter for TerminalWriter<W> {
    fn write_route(&mut self, route: &RouteRecord) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{:<7} {}",
            route.method.as_str().bold().green(),
            route.route_path.bold()
        )?;
        for line in route.handler.lines() {
            writeln!(self.writer, "        {}", line.dimmed())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} route(s) [language: {}, framework: {}]",
            "Found".bold(),
            summary.route_count,
            summary.detection.language,
            summary.detection.framework
        )?;
        if !summary.skipped.is_empty() {
            writeln!(
                self.writer,
                "{} {} file(s) could not be read or parsed",
                "Skipped".yellow(),
                summary.skipped.len()
            )?;
        }
        if summary.truncated {
            writeln!(
                self.writer,
                "{}",
                "File ceiling reached; results are partial".yellow()
            )?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

pub fn write_declarations<W: Write>(
    format: OutputFormat,
    mut writer: W,
    scan: &DeclarationScan,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, scan)?;
            writeln!(writer)?;
        }
        OutputFormat::Jsonl => {
            serde_json::to_writer(&mut writer, &scan.declarations)?;
            writeln!(writer)?;
        }
        OutputFormat::Terminal => write_declarations_terminal(&mut writer, &scan.declarations)?,
    }
    Ok(())
}

fn write_declarations_terminal<W: Write>(
    writer: &mut W,
    declarations: &DeclarationSet,
) -> anyhow::Result<()> {
    writeln!(writer, "{}", "Models".bold().underline())?;
    for model in &declarations.models {
        writeln!(
            writer,
            "  {} ({}): {}",
            model.name.bold(),
            model.layer.as_str().cyan(),
            model.fields.join(", ")
        )?;
    }
    writeln!(writer, "{}", "Controllers".bold().underline())?;
    for controller in &declarations.controllers {
        writeln!(
            writer,
            "  {}: {}",
            controller.name.bold(),
            controller.methods.join(", ")
        )?;
    }
    writeln!(writer, "{}", "Types".bold().underline())?;
    for ty in &declarations.types {
        writeln!(writer, "  {}: {}", ty.name.bold(), ty.properties.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DetectionResult, Framework, HttpMethod, Language};

    fn summary(routes: usize) -> ScanSummary {
        ScanSummary {
            detection: DetectionResult {
                language: Language::JavaScript,
                framework: Framework::Express,
            },
            route_count: routes,
            skipped: vec![],
            truncated: false,
        }
    }

    fn record() -> RouteRecord {
        RouteRecord::new(HttpMethod::Get, "/health", "app.get('/health', h)".into())
    }

    #[test]
    fn test_jsonl_writes_one_line_per_route() {
        let mut buffer = Vec::new();
        {
            let mut writer = create_route_writer(OutputFormat::Jsonl, &mut buffer);
            writer.write_route(&record()).unwrap();
            writer.write_route(&record()).unwrap();
            writer.finish(&summary(2)).unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["routePath"], "/health");
    }

    #[test]
    fn test_json_document_contains_detection_and_routes() {
        let mut buffer = Vec::new();
        {
            let mut writer = create_route_writer(OutputFormat::Json, &mut buffer);
            writer.write_route(&record()).unwrap();
            writer.finish(&summary(1)).unwrap();
        }
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["detection"]["framework"], "express");
        assert_eq!(value["routes"][0]["method"], "GET");
        assert_eq!(value["routes"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_terminal_lists_routes() {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        {
            let mut writer = create_route_writer(OutputFormat::Terminal, &mut buffer);
            writer.write_route(&record()).unwrap();
            writer.finish(&summary(1)).unwrap();
        }
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("GET"));
        assert!(text.contains("/health"));
        assert!(text.contains("Found 1 route(s)"));
    }
}
