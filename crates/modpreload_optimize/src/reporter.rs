use std::io::{self, Write};

use colored::Colorize;
use log::debug;
use modpreload_core::display_relative;

use crate::types::OptimizeReport;

pub fn print_report<W: Write>(writer: &mut W, report: &OptimizeReport) -> io::Result<()> {
    let root = &report.root;
    debug!("Printing report for {} files", report.files_scanned);

    writeln!(
        writer,
        "{} Optimized {} files in {}\n",
        "✓".green().bold(),
        report.files_scanned.to_string().cyan(),
        root.display().to_string().blue()
    )?;

    writeln!(
        writer,
        "  Scripts:     {} ({} minified)",
        report.scripts.to_string().bold(),
        report.scripts_minified
    )?;
    writeln!(
        writer,
        "  Pages:       {} ({} hinted, {} unchanged)",
        (report.pages_hinted + report.pages_unchanged).to_string().bold(),
        report.pages_hinted,
        report.pages_unchanged
    )?;
    writeln!(writer, "  Stylesheets: {}", report.stylesheets.to_string().bold())?;
    writeln!(writer, "  Other files: {}", report.other_files.to_string().dimmed())?;

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    if report.modules_preloaded == 0 {
        writeln!(
            writer,
            "{} No static imports found; {} is empty",
            "●".yellow(),
            display_relative(root, &report.aggregator_path).blue()
        )?;
    } else {
        writeln!(
            writer,
            "{} Preloading {} modules via {}",
            "●".bright_blue(),
            report.modules_preloaded.to_string().green().bold(),
            display_relative(root, &report.aggregator_path).blue()
        )?;
    }

    writer.flush()?;
    Ok(())
}
