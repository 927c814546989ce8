use clap::ValueEnum;
use indexmap::IndexMap;
use qcvars::core::io::base_values::BaseValues;
use qcvars::workflows::evaluate::EvaluationReport;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Aligned, human-readable columns.
    #[default]
    Table,
    /// `name,value,source,error` rows.
    Csv,
    /// A `"NAME" = value` table that can be read back as base values.
    Toml,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Toml => "toml",
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    value: Option<f64>,
    source: &'static str,
    error: Option<String>,
}

/// Base values not already reported as targets.
fn echoed_base_values<'a>(
    report: &'a EvaluationReport,
    base: Option<&'a BaseValues>,
) -> impl Iterator<Item = (&'a str, f64)> {
    base.into_iter()
        .flat_map(BaseValues::iter)
        .filter(|(name, _)| !report.values.contains_key(*name))
}

pub fn write_report<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    report: &EvaluationReport,
    base: Option<&BaseValues>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => write_table(writer, report, base),
        OutputFormat::Csv => write_csv(writer, report, base),
        OutputFormat::Toml => write_toml(writer, report, base),
    }
}

fn write_table<W: Write>(
    writer: &mut W,
    report: &EvaluationReport,
    base: Option<&BaseValues>,
) -> anyhow::Result<()> {
    let width = report
        .values
        .keys()
        .chain(report.errors.keys())
        .map(String::as_str)
        .chain(echoed_base_values(report, base).map(|(name, _)| name))
        .map(str::len)
        .max()
        .unwrap_or(0);

    for (name, value) in &report.values {
        writeln!(writer, "{:<width$}  {:>20.12}", name, value)?;
    }
    for (name, err) in &report.errors {
        writeln!(writer, "{:<width$}  {:>20}  {}", name, "FAILED", err)?;
    }

    let echoed: Vec<_> = echoed_base_values(report, base).collect();
    if !echoed.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "# Base values")?;
        for (name, value) in echoed {
            writeln!(writer, "{:<width$}  {:>20.12}", name, value)?;
        }
    }
    Ok(())
}

fn write_csv<W: Write>(
    writer: &mut W,
    report: &EvaluationReport,
    base: Option<&BaseValues>,
) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (name, value) in &report.values {
        csv_writer.serialize(CsvRow {
            name: name.as_str(),
            value: Some(*value),
            source: "derived",
            error: None,
        })?;
    }
    for (name, err) in &report.errors {
        csv_writer.serialize(CsvRow {
            name: name.as_str(),
            value: None,
            source: "derived",
            error: Some(err.to_string()),
        })?;
    }
    for (name, value) in echoed_base_values(report, base) {
        csv_writer.serialize(CsvRow {
            name,
            value: Some(value),
            source: "base",
            error: None,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Failed quantities have no value and are left out; they are reported on the log instead.
fn write_toml<W: Write>(
    writer: &mut W,
    report: &EvaluationReport,
    base: Option<&BaseValues>,
) -> anyhow::Result<()> {
    let mut table: IndexMap<&str, f64> = report
        .values
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    table.extend(echoed_base_values(report, base));

    let rendered = toml::to_string(&table)?;
    writer.write_all(rendered.as_bytes())?;
    Ok(())
}
