use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use recstream_chain::{digest384_file, ChainEntry, ChainValidator};
use recstream_codec::{EnvelopeReader, RecordFile};
use recstream_pipeline::{
    collect_record_files, FileStatus, PipelineConfig, RecordFilePipeline, RecordSink,
    SweepReport, TracingHandler,
};

use crate::cli::{
    Cli, Command, HashArgs, InspectArgs, OutputFormat, PrevHashArgs, SweepArgs, VerifyArgs,
};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Sweep(args) => cmd_sweep(args, &cli.format),
        Command::Verify(args) => cmd_verify(args, &cli.format),
        Command::Inspect(args) => cmd_inspect(args, &cli.format),
        Command::Hash(args) => cmd_hash(args, &cli.format),
        Command::PrevHash(args) => cmd_prev_hash(args),
    }
}

fn cmd_sweep(args: SweepArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let paths = collect_record_files(&args.dir, args.ext.as_deref())?;
    if paths.is_empty() {
        println!("No record files in {}", args.dir.display());
        return Ok(());
    }

    let sink = if args.quiet_records {
        RecordSink::disabled()
    } else {
        RecordSink::handler(TracingHandler)
    };
    let config = PipelineConfig {
        archive_dir: args.archive_dir,
        relocate: !args.keep,
    };
    let mut pipeline = RecordFilePipeline::new(config, sink)?;
    let report = pipeline.sweep(&paths);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }

    if !report.mismatches.is_empty() || report.files_failed() > 0 {
        anyhow::bail!(
            "sweep found {} chain mismatch(es), {} failed file(s)",
            report.mismatches.len(),
            report.files_failed()
        );
    }
    Ok(())
}

fn print_report(report: &SweepReport) {
    for outcome in &report.outcomes {
        let name = outcome.path.display();
        let digest = outcome
            .digest
            .map(|d| d.short_hex())
            .unwrap_or_else(|| "--------".into());
        match &outcome.status {
            FileStatus::Decoded => println!(
                "{} {}  {}  {} pairs{}",
                "✓".green().bold(),
                name,
                digest.dimmed(),
                outcome.pairs_decoded,
                if outcome.relocated { "" } else { "  (kept)" },
            ),
            FileStatus::Partial(defect) => println!(
                "{} {}  {}  {} pairs, stopped: {}",
                "~".yellow().bold(),
                name,
                digest.dimmed(),
                outcome.pairs_decoded,
                defect.to_string().yellow(),
            ),
            FileStatus::Failed(reason) => {
                println!("{} {}  {}", "✗".red().bold(), name, reason.red())
            }
            FileStatus::Missing => {
                println!("{} {}  {}", "✗".red().bold(), name, "missing".red())
            }
        }
    }

    for mismatch in &report.mismatches {
        println!("{} {}", "chain break:".red().bold(), mismatch);
    }

    let verdict = if report.mismatches.is_empty() {
        "chain intact".green().to_string()
    } else {
        format!("{} chain break(s)", report.mismatches.len())
            .red()
            .to_string()
    };
    println!(
        "{} file(s), {} pair(s), {} archived — {}",
        report.files_processed(),
        report.pairs_decoded(),
        report.files_relocated(),
        verdict,
    );
}

fn cmd_verify(args: VerifyArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let mut entries = Vec::new();
    for path in &args.files {
        let digest = digest384_file(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let file = RecordFile::read(path)
            .with_context(|| format!("cannot decode {}", path.display()))?;
        entries.push(ChainEntry {
            name: file_name(path),
            digest,
            declared_previous: file.previous_hash,
        });
    }

    let report = ChainValidator::verify_batch(&entries);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            for mismatch in &report.mismatches {
                println!("{} {}", "chain break:".red().bold(), mismatch);
            }
            if report.is_intact() {
                println!(
                    "{} {} file(s), chain intact",
                    "✓".green().bold(),
                    report.files_checked
                );
            }
        }
    }

    if !report.is_intact() {
        anyhow::bail!("{} chain break(s)", report.mismatches.len());
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let file = RecordFile::read(&args.file)
        .with_context(|| format!("cannot decode {}", args.file.display()))?;

    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "file": args.file,
                "format_version": file.format_version,
                "protocol_version": file.protocol_version,
                "previous_hash": file.previous_hash,
                "pairs": file.pairs.len(),
                "skipped": file.skipped,
                "signature_len": file.signature.as_ref().map(|s| s.len()),
                "defect": file.defect,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!("{}", args.file.display().to_string().bold());
            println!(
                "  format {}, protocol {}",
                file.format_version, file.protocol_version
            );
            println!("  previous hash: {}", file.previous_hash);
            for (index, pair) in file.pairs.iter().enumerate() {
                println!(
                    "  #{:<4} {}  fee {}  {}",
                    index + 1,
                    pair.record.consensus_timestamp,
                    pair.record.transaction_fee,
                    pair.record.status,
                );
            }
            for skipped in &file.skipped {
                println!(
                    "  {} block {}: {}",
                    "skipped".yellow(),
                    skipped.block_index,
                    skipped.reason
                );
            }
            match &file.signature {
                Some(sig) => println!("  signature: {} bytes", sig.len()),
                None => println!("  signature: none"),
            }
            if let Some(defect) = &file.defect {
                println!("  {} {}", "stopped:".yellow().bold(), defect);
            }
        }
    }
    Ok(())
}

fn cmd_hash(args: HashArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let digest = digest384_file(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({ "file": args.file, "sha384": digest })
        ),
        OutputFormat::Text => println!("{digest}"),
    }
    Ok(())
}

fn cmd_prev_hash(args: PrevHashArgs) -> anyhow::Result<()> {
    let previous = EnvelopeReader::read_previous_hash(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    println!("{previous}");
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
