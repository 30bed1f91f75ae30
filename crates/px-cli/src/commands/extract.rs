//! Extract command implementation

use anyhow::{bail, Context, Result};
use px_core::{
    DryRunFileSystem, Extraction, Extractor, LocalFileSystem, Migration, MigrationCode,
    MigrationDefinition, NumberedSlotResolver, QueryFilter, SchemaAllowList, SlotOutcome,
};
use serde::Serialize;
use std::path::Path;

use crate::cli::{ExtractArgs, ExtractOutput, GlobalArgs};
use crate::commands::common::{load_project, Project};

/// JSON report for one extract invocation
#[derive(Debug, Serialize)]
struct ExtractReport<'a> {
    dry_run: bool,
    written: usize,
    skipped: usize,
    migrations: &'a [Extraction],
}

/// Execute the extract command
pub(crate) fn execute(args: &ExtractArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let extractions = run(&project, args)?;

    match args.output {
        ExtractOutput::Text => print_text(&extractions, &project.root_dir(), args.dry_run),
        ExtractOutput::Json => print_json(&extractions, args.dry_run)?,
    }
    Ok(())
}

/// Discover definitions and extract them, honoring `--migration` and
/// `--dry-run`.
fn run(project: &Project, args: &ExtractArgs) -> Result<Vec<Extraction>> {
    let migrations_dir = project.migrations_dir();
    let mut definitions = MigrationDefinition::discover(&migrations_dir).with_context(|| {
        format!(
            "Failed to load migration definitions from {}",
            migrations_dir.display()
        )
    })?;

    if let Some(wanted) = &args.migration {
        let wanted = MigrationCode::try_new(wanted.as_str())
            .with_context(|| format!("'{}' is not a migration code", wanted))?;
        definitions.retain(|d| d.code().is_some_and(|c| c.same_number(&wanted)));
        if definitions.is_empty() {
            bail!(
                "No migration with code {} in {}",
                wanted,
                migrations_dir.display()
            );
        }
    }

    if definitions.is_empty() {
        log::warn!("No migration definitions found in {}", migrations_dir.display());
        return Ok(Vec::new());
    }

    let config = &project.config;
    let filter: Box<dyn QueryFilter> = match &config.schemas {
        Some(schemas) => Box::new(SchemaAllowList::new(
            schemas.iter().cloned(),
            config.bookkeeping_filter(),
        )),
        None => Box::new(config.bookkeeping_filter()),
    };
    let resolver = NumberedSlotResolver::new(config.direction_dirs());
    let root = project.root_dir();

    let extractions = if args.dry_run {
        Extractor::new(&root, filter, resolver, DryRunFileSystem::new(LocalFileSystem))
            .extract_all(&definitions)
    } else {
        Extractor::new(&root, filter, resolver, LocalFileSystem).extract_all(&definitions)
    }
    .context("Extraction failed")?;

    Ok(extractions)
}

fn print_text(extractions: &[Extraction], root: &Path, dry_run: bool) {
    if extractions.is_empty() {
        println!("No migrations to extract");
        return;
    }

    let write_label = if dry_run { "would write" } else { "written" };
    for extraction in extractions {
        println!("{} ({})", extraction.migration, extraction.code);
        for outcome in &extraction.outcomes {
            match outcome {
                SlotOutcome::Written { path, .. } => {
                    let shown = path.strip_prefix(root).unwrap_or(path.as_path());
                    println!("  {:<11}  {}", write_label, shown.display());
                }
                SlotOutcome::Skipped { schema, direction } => {
                    println!("  {:<11}  {}/{} (already extracted)", "skipped", schema, direction);
                }
            }
        }
    }

    let (written, skipped) = totals(extractions);
    println!();
    println!(
        "{} migration{}: {} {}, {} skipped",
        extractions.len(),
        if extractions.len() == 1 { "" } else { "s" },
        written,
        write_label,
        skipped
    );
}

fn print_json(extractions: &[Extraction], dry_run: bool) -> Result<()> {
    let (written, skipped) = totals(extractions);
    let report = ExtractReport {
        dry_run,
        written,
        skipped,
        migrations: extractions,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn totals(extractions: &[Extraction]) -> (usize, usize) {
    extractions.iter().fold((0, 0), |(w, s), e| {
        (w + e.written().count(), s + e.skipped_count())
    })
}
