//! Output formatting module

use taller_app::bootstrap::BootstrapReport;
use taller_app::Config;
use taller_types::{OutputFormat, Result};

pub fn output_report(output_format: OutputFormat, report: &BootstrapReport) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("\nData directory");
    println!("==============");
    for table in &report.tables {
        println!("{:<12} {}", table.table, table.status);
    }

    println!();
    match &report.seeded_admin {
        Some(name) => println!("Seeded admin:     {} (change its password)", name),
        None => println!("Seeded admin:     -"),
    }
    if report.promoted.is_empty() {
        println!("Promoted admins:  -");
    } else {
        println!("Promoted admins:  {}", report.promoted.join(", "));
    }
    println!("Rehashed:         {}", report.rehashed);
    if !report.unverifiable.is_empty() {
        println!(
            "Reset needed:     {} (password hash from another tool)",
            report.unverifiable.join(", ")
        );
    }
    Ok(())
}

pub fn output_config(output_format: OutputFormat, config: &Config) -> Result<()> {
    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config);
    }
    Ok(())
}
