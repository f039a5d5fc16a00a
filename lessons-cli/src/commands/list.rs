//! List lessons in the catalog

use std::path::Path;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use lessons_core::{Lesson, LessonCatalog};

use crate::catalog;
use crate::config::LessonsConfig;

pub fn run(catalog_flag: Option<&Path>, config: &LessonsConfig) -> Result<()> {
    let catalog = catalog::load(catalog_flag, config)?;
    let lessons = catalog.lessons();

    if lessons.is_empty() {
        println!("No lessons in catalog");
        return Ok(());
    }

    println!("{}", lesson_table(lessons.iter().map(|l| l.as_ref())));
    Ok(())
}

fn lesson_table<'a>(lessons: impl Iterator<Item = &'a Lesson>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID").fg(Color::Cyan),
        Cell::new("Title").fg(Color::Cyan),
        Cell::new("Exercises").fg(Color::Cyan),
        Cell::new("XP").fg(Color::Cyan),
    ]);

    for lesson in lessons {
        table.add_row(vec![
            Cell::new(&lesson.id),
            Cell::new(&lesson.title),
            Cell::new(lesson.len()),
            Cell::new(lesson.total_xp()),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessons_core::Exercise;

    #[test]
    fn table_has_one_row_per_lesson() {
        let lessons = [
            Lesson::new("variables", "Variables")
                .with_exercise(Exercise::free_text("Name?", "x", 15)),
            Lesson::new("loops", "Loops"),
        ];

        let rendered = lesson_table(lessons.iter()).to_string();

        assert!(rendered.contains("variables"));
        assert!(rendered.contains("Loops"));
        assert!(rendered.contains("15"));
        assert_eq!(lesson_table(lessons.iter()).row_iter().count(), 2);
    }
}
