//! Keyword practice drill
//!
//! Each line names a keyword to practice. Practice raises its mastery and
//! grants XP until the keyword is mastered.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use lessons_core::{KeywordMastery, MasteryError, Practice, SharedProgression};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use super::play::xp_bar;
use crate::config::LessonsConfig;

/// Keywords shipped with the binary
const BUILTIN_KEYWORDS: &str = include_str!("../../assets/keywords.json");

const MASTERY_BAR_WIDTH: usize = 10;

#[derive(Args, Debug)]
pub struct PracticeArgs {
    /// Keyword list (JSON) to use instead of the built-in keywords
    #[arg(long, value_name = "PATH")]
    pub keywords: Option<PathBuf>,
}

pub async fn run(args: PracticeArgs, config: &LessonsConfig) -> Result<()> {
    let keywords = load_keywords(args.keywords.as_deref())?;
    let progression = SharedProgression::new(config.progression_store());

    let mut drill = Drill::new(
        keywords,
        progression,
        BufReader::new(tokio::io::stdin()),
        std::io::stdout(),
    );
    drill.run().await
}

fn load_keywords(path: Option<&std::path::Path>) -> Result<KeywordMastery> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read keywords {}", path.display()))?;
            KeywordMastery::from_json_str(&json)
                .with_context(|| format!("Invalid keywords in {}", path.display()))
        }
        None => KeywordMastery::from_json_str(BUILTIN_KEYWORDS).context("Built-in keywords are invalid"),
    }
}

fn mastery_table(keywords: &KeywordMastery) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Keyword").fg(Color::Cyan),
        Cell::new("Mastery").fg(Color::Cyan),
        Cell::new("Status").fg(Color::Cyan),
    ]);

    for keyword in keywords.keywords() {
        let filled = keyword.mastery as usize * MASTERY_BAR_WIDTH / 100;
        let bar = format!(
            "[{}{}] {}%",
            "#".repeat(filled),
            "-".repeat(MASTERY_BAR_WIDTH - filled),
            keyword.mastery
        );
        let status = if keyword.is_mastered() {
            Cell::new("Mastered").fg(Color::Green)
        } else {
            Cell::new("Practice")
        };
        table.add_row(vec![Cell::new(&keyword.name), Cell::new(bar), status]);
    }

    table
}

/// Reads keyword names line by line and practices them
pub struct Drill<R, W> {
    keywords: KeywordMastery,
    progression: SharedProgression,
    lines: Lines<R>,
    out: W,
}

impl<R, W> Drill<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(keywords: KeywordMastery, progression: SharedProgression, input: R, out: W) -> Self {
        Self {
            keywords,
            progression,
            lines: input.lines(),
            out,
        }
    }

    /// Practice until an empty line or end of input
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{}", mastery_table(&self.keywords))?;

        loop {
            write!(self.out, "Keyword to practice (empty line to stop)> ")?;
            self.out.flush()?;

            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            let name = line.trim();
            if name.is_empty() {
                break;
            }
            self.practice(name).await?;
        }

        let snapshot = self.progression.snapshot().await;
        writeln!(
            self.out,
            "\n{}\nMastered keywords: {}/{}",
            xp_bar(&snapshot),
            self.keywords.mastered_count(),
            self.keywords.keywords().len()
        )?;
        Ok(())
    }

    async fn practice(&mut self, name: &str) -> Result<()> {
        let result = {
            let mut store = self.progression.lock().await;
            self.keywords.practice(name, &mut store)
        };

        match result {
            Ok(practice @ Practice::Practiced { mastery, gain }) => {
                writeln!(self.out, "{name}: mastery {mastery}% (+{} XP)", gain.amount)?;
                if practice.reached_mastery() {
                    writeln!(self.out, "{name} mastered!")?;
                }
                if gain.leveled_up() {
                    writeln!(self.out, "*** Level up! You reached level {} ***", gain.level)?;
                }
            }
            Ok(Practice::AlreadyMastered) => {
                writeln!(self.out, "{name} is already mastered")?;
            }
            Err(MasteryError::UnknownKeyword(_)) => {
                writeln!(self.out, "Unknown keyword: {name}")?;
            }
            Err(err) => return Err(err.into()),
        }
        Ok(())
    }
}
