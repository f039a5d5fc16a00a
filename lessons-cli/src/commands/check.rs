//! Validate a lesson catalog file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lessons_core::{LessonCatalog, StaticCatalog};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Catalog file to validate
    pub path: PathBuf,
}

pub fn run(args: CheckArgs) -> Result<()> {
    let catalog = StaticCatalog::from_path(&args.path)
        .with_context(|| format!("{} is not a valid catalog", args.path.display()))?;
    println!("{}", summary(&catalog));
    Ok(())
}

fn summary(catalog: &StaticCatalog) -> String {
    let lessons = catalog.lessons();
    let exercises: usize = lessons.iter().map(|l| l.len()).sum();
    let xp: u64 = lessons.iter().map(|l| l.total_xp()).sum();
    format!(
        "OK: {} lessons, {} exercises, {} XP available",
        lessons.len(),
        exercises,
        xp
    )
}
