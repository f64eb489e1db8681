//! `c2b migrate` command implementation.

use std::path::{Path, PathBuf};

use c2b_config::CliSettings;
use c2b_migrate::{
    ContentKind, ErrorLog, ExportNode, MigrationOptions, MigrationReport, Migrator, load_export,
};
use clap::Args;

use super::{ConnectionArgs, connect};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the migrate command.
#[derive(Args)]
pub(crate) struct MigrateArgs {
    /// Export directory containing index.html (default: [source] path from config).
    source: Option<PathBuf>,

    /// Embed images and upload attachments into created pages.
    #[arg(long)]
    pub(crate) attachments: bool,

    /// Print the planned hierarchy without contacting BookStack.
    #[arg(long)]
    pub(crate) dry_run: bool,

    #[command(flatten)]
    pub(crate) connection: ConnectionArgs,
}

impl MigrateArgs {
    /// Execute the migrate command.
    ///
    /// # Errors
    ///
    /// Returns an error if no source directory is given, configuration is
    /// invalid, the connection check fails or the source directory does not
    /// exist.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let settings = CliSettings {
            source_path: self.source.clone(),
            attachments: self.attachments.then_some(true),
            ..self.connection.cli_settings()
        };
        let config = self.connection.load_config(&settings)?;
        let source = config.require_source()?;

        if self.dry_run {
            return print_plan(&output, source);
        }

        let client = connect(&config, &output)?;
        output.info(&format!("Migrating {}...", source.display()));

        let options = MigrationOptions {
            attachments: config.migration.attachments,
            source_tag: config.migration.source_tag.clone(),
        };
        let report = Migrator::new(&client, source, options).run()?;
        print_report(&output, &report);
        Ok(())
    }
}

fn print_plan(output: &Output, source: &Path) -> Result<(), CliError> {
    let mut errors = ErrorLog::default();
    let export = load_export(source, &mut errors)?;

    output.highlight("\n[DRY RUN] No changes made.");
    output.info(&format!("Export root: {}", export.root.display()));
    if export.nodes.is_empty() {
        output.warning("No hierarchy found.");
    }
    for line in plan_lines(&export.nodes) {
        output.info(&line);
    }
    for record in errors.records() {
        output.warning(&format!("  - {record}"));
    }
    Ok(())
}

/// One indented `Kind: title` line per node, depth first.
fn plan_lines(nodes: &[ExportNode]) -> Vec<String> {
    fn walk(nodes: &[ExportNode], lines: &mut Vec<String>) {
        for node in nodes {
            let kind = node.kind().map_or("?", |kind| kind.as_str());
            let indent = "  ".repeat(node.depth.saturating_sub(1));
            lines.push(format!("{indent}{kind}: {}", node.title));
            walk(&node.children, lines);
        }
    }
    let mut lines = Vec::new();
    walk(nodes, &mut lines);
    lines
}

fn print_report(output: &Output, report: &MigrationReport) {
    output.separator();
    output.highlight("Migration report");
    for (label, kind) in [
        ("Shelves", ContentKind::Shelf),
        ("Books", ContentKind::Book),
        ("Chapters", ContentKind::Chapter),
        ("Pages", ContentKind::Page),
    ] {
        output.info(&format!("{label} created: {}", report.created(kind)));
    }
    output.info(&format!("Total: {}", report.total()));

    if report.errors.is_empty() {
        output.success("\nMigration completed without errors.");
    } else {
        output.warning(&format!("\nErrors encountered: {}", report.errors.len()));
        for record in &report.errors {
            output.detail(&format!("  - {record}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(title: &str, depth: usize, children: Vec<ExportNode>) -> ExportNode {
        ExportNode {
            title: title.to_owned(),
            href: String::new(),
            depth,
            children,
        }
    }

    #[test]
    fn test_plan_lines() {
        let tree = vec![node(
            "Space",
            1,
            vec![node(
                "Guide",
                2,
                vec![node("Setup", 3, vec![node("Linux", 4, Vec::new())])],
            )],
        )];
        assert_eq!(
            plan_lines(&tree),
            [
                "Shelf: Space",
                "  Book: Guide",
                "    Chapter: Setup",
                "      Page: Linux",
            ]
        );
    }
}
