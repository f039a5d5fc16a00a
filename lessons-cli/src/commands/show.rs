//! Show a lesson's content and exercises

use std::path::Path;

use anyhow::{Result, bail};
use clap::Args;
use lessons_core::{Exercise, ExerciseKind, Lesson, LessonCatalog};

use crate::catalog;
use crate::config::LessonsConfig;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Lesson ID
    pub lesson_id: String,
}

pub fn run(args: ShowArgs, catalog_flag: Option<&Path>, config: &LessonsConfig) -> Result<()> {
    let catalog = catalog::load(catalog_flag, config)?;
    let Some(lesson) = catalog.lookup(&args.lesson_id) else {
        bail!("Lesson not found: {}", args.lesson_id);
    };

    print!("{}", render_lesson(&lesson));
    Ok(())
}

/// Lesson overview without answers
pub fn render_lesson(lesson: &Lesson) -> String {
    let mut out = format!("{} ({})\n", lesson.title, lesson.id);
    if !lesson.content.is_empty() {
        out.push_str(&format!("\n{}\n", lesson.content));
    }

    out.push_str(&format!(
        "\n{} exercises, {} XP\n",
        lesson.len(),
        lesson.total_xp()
    ));
    for (index, exercise) in lesson.exercises.iter().enumerate() {
        out.push_str(&format!("\n{}. ", index + 1));
        out.push_str(&render_exercise(exercise));
    }
    out
}

/// Prompt, snippet and options of one exercise
pub fn render_exercise(exercise: &Exercise) -> String {
    let mut out = format!("{} [{} XP]\n", exercise.prompt, exercise.xp_reward);
    match &exercise.kind {
        ExerciseKind::MultipleChoice { options, .. } => {
            for (index, option) in options.iter().enumerate() {
                out.push_str(&format!("   {}) {}\n", index + 1, option));
            }
        }
        ExerciseKind::FreeText { snippet, .. } => {
            if let Some(snippet) = snippet {
                for line in snippet.lines() {
                    out.push_str(&format!("   | {line}\n"));
                }
            }
        }
    }
    out
}
