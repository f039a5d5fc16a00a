//! Interactive lesson player
//!
//! Reads answers line by line, submits them through the session manager and
//! waits for each gate release before presenting the next exercise. Level-ups
//! and completions are reported from the event stream.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use lessons_core::{
    Answer, EventBus, EventSeq, Exercise, ExerciseKind, LessonCatalog, MemoryEventBus,
    ProgressionEvent, ProgressionSnapshot, SessionManager, SharedProgression,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::debug;

use super::show::render_exercise;
use crate::catalog;
use crate::config::LessonsConfig;

const XP_BAR_WIDTH: usize = 20;

#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Lesson to start with (default: first lesson in the catalog)
    pub lesson_id: Option<String>,

    /// Continue through the following lessons without asking
    #[arg(long)]
    pub all: bool,
}

pub async fn run(args: PlayArgs, catalog_flag: Option<&Path>, config: &LessonsConfig) -> Result<()> {
    let catalog = Arc::new(catalog::load(catalog_flag, config)?);
    let start = match args.lesson_id {
        Some(id) => id,
        None => catalog
            .lessons()
            .first()
            .map(|lesson| lesson.id.clone())
            .context("Catalog has no lessons")?,
    };

    let manager = SessionManager::new(
        catalog,
        SharedProgression::new(config.progression_store()),
        Arc::new(MemoryEventBus::default()),
        config.session_config(),
    );

    let mut player = Player::new(manager, BufReader::new(tokio::io::stdin()), std::io::stdout());
    player.play(&start, args.all).await?;

    let snapshot = player.manager().snapshot().await;
    println!("\n{}", summary(&snapshot));
    Ok(())
}

/// Turn a typed line into an answer for `exercise`.
///
/// Multiple-choice options are numbered from 1; anything else is submitted
/// as typed and judged by the evaluator.
pub fn parse_answer(exercise: &Exercise, line: &str) -> Answer {
    if let ExerciseKind::MultipleChoice { .. } = exercise.kind
        && let Ok(number) = line.trim().parse::<usize>()
    {
        // 0 maps out of range, which evaluates as incorrect
        return Answer::Choice(number.checked_sub(1).unwrap_or(usize::MAX));
    }
    Answer::text(line)
}

/// Level and XP bar, e.g. `Level 2 [######--------------] 30/100 XP`
pub fn xp_bar(snapshot: &ProgressionSnapshot) -> String {
    let filled = usize::from(snapshot.percent()) * XP_BAR_WIDTH / 100;
    format!(
        "Level {} [{}{}] {}/{} XP",
        snapshot.level,
        "#".repeat(filled),
        "-".repeat(XP_BAR_WIDTH - filled),
        snapshot.xp,
        snapshot.xp_per_level
    )
}

pub fn summary(snapshot: &ProgressionSnapshot) -> String {
    let completed: Vec<_> = snapshot.completed_lessons.iter().map(String::as_str).collect();
    let completed = if completed.is_empty() {
        "none".to_string()
    } else {
        completed.join(", ")
    };
    format!("{}\nCompleted lessons: {}", xp_bar(snapshot), completed)
}

/// Drives lessons from line-based input
pub struct Player<R, W> {
    manager: SessionManager,
    lines: Lines<R>,
    out: W,
    /// Next event to report
    cursor: EventSeq,
}

impl<R, W> Player<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(manager: SessionManager, input: R, out: W) -> Self {
        let cursor = manager.event_bus().current_seq();
        Self {
            manager,
            lines: input.lines(),
            out,
            cursor,
        }
    }

    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    /// Play `lesson_id`, then offer (or with `all`, take) the following lessons.
    pub async fn play(&mut self, lesson_id: &str, all: bool) -> Result<()> {
        let mut next = Some(lesson_id.to_string());

        while let Some(id) = next.take() {
            if !self.play_lesson(&id).await? {
                break;
            }

            let Some(after) = self.manager.catalog().next_after(&id) else {
                writeln!(self.out, "\nThat was the last lesson.")?;
                break;
            };
            if all || self.confirm(&format!("Next lesson: {}. Continue? [y/N]", after.title)).await? {
                next = Some(after.id.clone());
            }
        }

        Ok(())
    }

    /// Returns false when input ran out before the lesson was complete
    async fn play_lesson(&mut self, lesson_id: &str) -> Result<bool> {
        let session_id = self.manager.start_session(lesson_id).await?;
        let info = self.manager.session_info(&session_id).await?;

        writeln!(self.out, "\n== {} ==", info.lesson_title)?;
        if let Some(lesson) = self.manager.catalog().lookup(lesson_id)
            && !lesson.content.is_empty()
        {
            writeln!(self.out, "{}", lesson.content)?;
        }
        self.report_events().await?;

        while let Some(exercise) = self.manager.current_exercise(&session_id).await? {
            let progress = self.manager.progress(&session_id).await?;
            write!(
                self.out,
                "\nQuestion {}/{}: {}> ",
                progress.index + 1,
                progress.total,
                render_exercise(&exercise)
            )?;
            self.out.flush()?;

            let Some(line) = self.read_line().await? else {
                debug!(session_id = %session_id, "Input closed mid-lesson");
                self.manager.end_session(&session_id).await?;
                return Ok(false);
            };

            let result = self
                .manager
                .submit(&session_id, &parse_answer(&exercise, &line))
                .await?;
            if result.correct {
                writeln!(self.out, "Correct! +{} XP", result.xp_awarded)?;
            } else if result.accepted {
                writeln!(self.out, "Not quite, try again.")?;
            }
            self.report_events().await?;

            self.manager.wait_released(&session_id).await?;
        }

        self.manager.end_session(&session_id).await?;
        Ok(true)
    }

    async fn report_events(&mut self) -> Result<()> {
        let events = self.manager.event_bus().events_from(self.cursor).await;

        for (seq, event) in events {
            self.cursor = seq + 1;
            match event {
                ProgressionEvent::LevelUp { to, .. } => {
                    writeln!(self.out, "*** Level up! You reached level {} ***", to)?;
                }
                ProgressionEvent::LessonCompleted { first_time, .. } => {
                    let note = if first_time { "" } else { " (already completed before)" };
                    writeln!(self.out, "Lesson complete!{}", note)?;
                    let snapshot = self.manager.snapshot().await;
                    writeln!(self.out, "{}", xp_bar(&snapshot))?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    async fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.out, "{} ", question)?;
        self.out.flush()?;
        let answer = self.read_line().await?.unwrap_or_default();
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}
