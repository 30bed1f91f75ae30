//! Ls command implementation

use anyhow::{Context, Result};
use px_core::{list_slots, SlotEntry};

use crate::cli::{GlobalArgs, LsArgs, LsOutput};
use crate::commands::common::{load_project, Project};

/// Execute the ls command
pub(crate) fn execute(args: &LsArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let slots = collect(&project, args.schema.as_deref())?;

    match args.output {
        LsOutput::Table => print_table(&slots),
        LsOutput::Json => print_json(&slots)?,
    }

    Ok(())
}

/// Slot files under the project's root, optionally limited to one schema.
fn collect(project: &Project, schema: Option<&str>) -> Result<Vec<SlotEntry>> {
    let root = project.root_dir();
    let mut slots = list_slots(&root, &project.config.direction_dirs())
        .with_context(|| format!("Failed to list slots under {}", root.display()))?;

    if let Some(schema) = schema {
        slots.retain(|s| s.schema == schema);
    }
    Ok(slots)
}

/// Print slots in table format
fn print_table(slots: &[SlotEntry]) {
    if slots.is_empty() {
        println!("No slot files found");
        return;
    }

    let schema_width = slots
        .iter()
        .map(|s| s.schema.len())
        .max()
        .unwrap_or(6)
        .max(6);
    let dir_width = slots
        .iter()
        .map(|s| s.direction_dir.len())
        .max()
        .unwrap_or(9)
        .max(9);
    let slot_width = 9;

    println!(
        "{:<schema_width$}  {:<dir_width$}  {:<slot_width$}  MIGRATION",
        "SCHEMA", "DIRECTION", "SLOT",
    );
    println!(
        "{:-<schema_width$}  {:-<dir_width$}  {:-<slot_width$}  {}",
        "",
        "",
        "",
        "-".repeat(9),
    );

    for slot in slots {
        let file_name = slot
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| slot.number.to_string());
        let code = slot
            .code
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<schema_width$}  {:<dir_width$}  {:<slot_width$}  {}",
            slot.schema, slot.direction_dir, file_name, code,
        );
    }

    let unowned = slots.iter().filter(|s| s.code.is_none()).count();
    println!();
    if unowned > 0 {
        println!("{} slot files, {} without a migration header", slots.len(), unowned);
    } else {
        println!("{} slot files found", slots.len());
    }
}

/// Print slots in JSON format
fn print_json(slots: &[SlotEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(slots).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use px_core::Config;
    use tempfile::TempDir;

    fn write(dir: &TempDir, rel: &str, contents: &str) {
        let path = dir.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn project(dir: &TempDir) -> Project {
        Project {
            dir: dir.path().to_path_buf(),
            config: Config::new("out"),
        }
    }

    #[test]
    fn test_collect_reads_headers() {
        let dir = TempDir::new().unwrap();
        write(&dir, "out/main/up/00001.sql", "# 4821\nSELECT 1;\n");
        write(&dir, "out/main/up/00002.sql", "SELECT 2;\n");
        write(&dir, "out/audit/down/00001.sql", "# 7\nSELECT 3;\n");

        let slots = collect(&project(&dir), None).unwrap();
        assert_eq!(slots.len(), 3);

        let owned: Vec<Option<String>> = slots
            .iter()
            .map(|s| s.code.as_ref().map(|c| c.to_string()))
            .collect();
        assert!(owned.contains(&Some("4821".to_string())));
        assert!(owned.contains(&Some("7".to_string())));
        assert!(owned.contains(&None));
    }

    #[test]
    fn test_collect_schema_filter() {
        let dir = TempDir::new().unwrap();
        write(&dir, "out/main/up/00001.sql", "# 1\nSELECT 1;\n");
        write(&dir, "out/audit/up/00001.sql", "# 1\nSELECT 1;\n");

        let slots = collect(&project(&dir), Some("audit")).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].schema, "audit");
    }

    #[test]
    fn test_collect_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(collect(&project(&dir), None).unwrap().is_empty());
    }
}
