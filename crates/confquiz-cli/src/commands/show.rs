//! The `confquiz show` command.

use std::path::PathBuf;

use anyhow::Result;

use confquiz_report::text;
use confquiz_report::SessionResult;

pub fn execute(file: PathBuf) -> Result<()> {
    let result = SessionResult::load_json(&file)?;
    print!("{}", text::render(&result));
    Ok(())
}
