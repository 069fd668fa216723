#[cfg(any(feature = "with-serde", feature = "with-csv"))]
use anyhow::Context;
use anyhow::{Result, bail};

use canonical_email::{CanonicalView, MailboxProvider, MxError, MxErrorKind, ResolvedAddress};

use crate::args::Cli;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct OutputRow {
    pub input: String,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub canonical: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub provider: Option<&'static str>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error: Option<String>,
    #[cfg_attr(feature = "with-serde", serde(skip_serializing_if = "Option::is_none"))]
    pub error_kind: Option<MxErrorKind>,
}

impl OutputRow {
    pub fn new(input: &str, result: Result<ResolvedAddress, MxError>) -> Self {
        match result {
            Ok(resolved) => Self {
                input: input.to_string(),
                canonical: Some(resolved.canonical),
                provider: resolved.provider,
                error: None,
                error_kind: None,
            },
            Err(err) => Self {
                input: input.to_string(),
                canonical: None,
                provider: None,
                error: Some(err.to_string()),
                error_kind: Some(err.kind()),
            },
        }
    }
}

/// One line of `--edits` output: the input as typed and what is shown for it.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct EditRow<'a> {
    pub input: &'a str,
    #[cfg_attr(feature = "with-serde", serde(flatten))]
    pub view: &'a CanonicalView,
}

pub fn any_failed(rows: &[OutputRow]) -> bool {
    rows.iter().any(|row| row.error.is_some())
}

pub fn write_reports(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

fn write_human(rows: &[OutputRow]) -> Result<()> {
    for row in rows {
        match (&row.canonical, &row.error) {
            (Some(canonical), _) => {
                let provider = row.provider.unwrap_or("unknown provider");
                println!("[OK]     {} -> {canonical} ({provider})", row.input);
            }
            (None, Some(error)) => println!("[FAILED] {} :: {error}", row.input),
            (None, None) => println!("[FAILED] {}", row.input),
        }
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn write_json(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    emit(cli, s.as_bytes())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_rows: &[OutputRow], _cli: &Cli) -> Result<()> {
    bail!("format=json requires the 'with-serde' feature")
}

#[cfg(feature = "with-serde")]
fn write_ndjson(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let mut buf = Vec::new();
    for row in rows {
        let line = serde_json::to_string(row)?;
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
    }
    emit(cli, &buf)
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson(_rows: &[OutputRow], _cli: &Cli) -> Result<()> {
    bail!("format=ndjson requires the 'with-serde' feature")
}

#[cfg(feature = "with-csv")]
fn write_csv(rows: &[OutputRow], cli: &Cli) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["input", "canonical", "provider", "error_kind", "error"])?;
    for row in rows {
        wtr.write_record([
            row.input.as_str(),
            row.canonical.as_deref().unwrap_or(""),
            row.provider.unwrap_or(""),
            row.error_kind.map(|k| k.as_str()).unwrap_or(""),
            row.error.as_deref().unwrap_or(""),
        ])?;
    }
    let data = wtr.into_inner().context("flush csv")?;
    emit(cli, &data)
}

#[cfg(not(feature = "with-csv"))]
fn write_csv(_rows: &[OutputRow], _cli: &Cli) -> Result<()> {
    bail!("format=csv requires the 'with-csv' feature")
}

pub fn write_edit(row: &EditRow<'_>, cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => {
            let view = row.view;
            if view.loading {
                println!("[LOADING] {}", row.input);
            } else if let Some(error) = &view.error {
                println!("[FAILED]  {} :: {error}", row.input);
            } else if !view.canonical_address.is_empty() {
                println!("[OK]      {} -> {}", row.input, view.canonical_address);
            } else {
                println!("[IDLE]    {}", row.input);
            }
            Ok(())
        }
        "json" | "ndjson" => write_edit_json(row),
        other => bail!("--edits supports --format human|json|ndjson, not '{other}'"),
    }
}

#[cfg(feature = "with-serde")]
fn write_edit_json(row: &EditRow<'_>) -> Result<()> {
    println!("{}", serde_json::to_string(row)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_edit_json(_row: &EditRow<'_>) -> Result<()> {
    bail!("JSON output requires the 'with-serde' feature")
}

pub fn write_providers(providers: &[MailboxProvider], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => {
            for provider in providers {
                println!(
                    "{:<12} {:<28} {}",
                    provider.name,
                    provider.rules.enabled().join(","),
                    provider.mx_domains.join(" ")
                );
            }
            Ok(())
        }
        "json" | "ndjson" => write_providers_json(providers, cli),
        other => bail!("providers supports --format human|json|ndjson, not '{other}'"),
    }
}

#[cfg(feature = "with-serde")]
fn write_providers_json(providers: &[MailboxProvider], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(providers)?;
    emit(cli, s.as_bytes())
}

#[cfg(not(feature = "with-serde"))]
fn write_providers_json(_providers: &[MailboxProvider], _cli: &Cli) -> Result<()> {
    bail!("JSON output requires the 'with-serde' feature")
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn emit(cli: &Cli, bytes: &[u8]) -> Result<()> {
    match &cli.out {
        Some(path) => write_all_atomically(path, bytes).with_context(|| format!("write {path}")),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            if !bytes.ends_with(b"\n") {
                stdout.write_all(b"\n")?;
            }
            Ok(())
        }
    }
}

#[cfg(any(feature = "with-serde", feature = "with-csv"))]
fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;
    let tmp = format!("{}.tmp", path);
    {
        let mut f = std::fs::File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
