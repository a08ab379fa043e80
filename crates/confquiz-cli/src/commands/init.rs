//! The `confquiz init` command.

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    let path = std::path::Path::new("confquiz.toml");
    if path.exists() {
        println!("confquiz.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG).context("failed to write confquiz.toml")?;
        println!("Created confquiz.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point base_url in confquiz.toml at your quiz service");
    println!("  2. Run: confquiz health");
    println!("  3. Run: confquiz play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# confquiz configuration

# Root URL of the quiz service. ${VAR} references are expanded.
base_url = "http://localhost:5000"

# Per-request timeout in seconds.
timeout_secs = 120

# Question language: "en" or "de".
language = "en"

# Where finished sessions are exported as JSON.
output_dir = "./confquiz-results"
"#;
