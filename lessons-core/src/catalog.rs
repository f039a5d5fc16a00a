//! Read-only lesson lookup
//!
//! The catalog is an external content source keyed by lesson id. The core
//! never mutates it; [`StaticCatalog`] is the in-memory implementation backed
//! by a JSON array of lessons.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::CatalogError;
use crate::lesson::Lesson;

/// Lookup of lessons by id
pub trait LessonCatalog: Send + Sync {
    /// Find a lesson by id
    fn lookup(&self, id: &str) -> Option<Arc<Lesson>>;

    /// All lessons in catalog order
    fn lessons(&self) -> Vec<Arc<Lesson>>;

    /// The lesson following `id` in catalog order, if any
    fn next_after(&self, id: &str) -> Option<Arc<Lesson>> {
        let lessons = self.lessons();
        let position = lessons.iter().position(|l| l.id == id)?;
        lessons.get(position + 1).cloned()
    }
}

/// Immutable catalog over an ordered list of lessons
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    lessons: Vec<Arc<Lesson>>,
    by_id: HashMap<String, usize>,
}

impl StaticCatalog {
    /// Build a catalog, validating ids and exercises
    pub fn from_lessons(lessons: Vec<Lesson>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(lessons.len());

        for (position, lesson) in lessons.iter().enumerate() {
            if lesson.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if by_id.insert(lesson.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateLesson(lesson.id.clone()));
            }
            for (index, exercise) in lesson.exercises.iter().enumerate() {
                exercise
                    .validate()
                    .map_err(|reason| CatalogError::InvalidExercise {
                        lesson: lesson.id.clone(),
                        index,
                        reason,
                    })?;
            }
        }

        debug!(lessons = lessons.len(), "Built lesson catalog");
        Ok(Self {
            lessons: lessons.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// Parse a JSON array of lessons
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let lessons: Vec<Lesson> = serde_json::from_str(json)?;
        Self::from_lessons(lessons)
    }

    /// Load a JSON catalog file
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Number of lessons
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// True when the catalog holds no lessons
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

impl LessonCatalog for StaticCatalog {
    fn lookup(&self, id: &str) -> Option<Arc<Lesson>> {
        self.by_id.get(id).map(|&i| Arc::clone(&self.lessons[i]))
    }

    fn lessons(&self) -> Vec<Arc<Lesson>> {
        self.lessons.clone()
    }

    fn next_after(&self, id: &str) -> Option<Arc<Lesson>> {
        let position = *self.by_id.get(id)?;
        self.lessons.get(position + 1).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::exercise::Exercise;

    const CATALOG: &str = r#"[
        {
            "id": "variables",
            "title": "Variables",
            "content": "A variable stores a value.",
            "exercises": [
                {
                    "type": "multiple_choice",
                    "prompt": "What is a variable?",
                    "xp_reward": 10,
                    "options": ["A container for storing data", "A loop"],
                    "correct_index": 0
                },
                {
                    "type": "free_text",
                    "prompt": "Which name holds 10?",
                    "xp_reward": 15,
                    "expected_answer": "x",
                    "snippet": "x = 10\nprint( ___ )"
                }
            ]
        },
        { "id": "loops", "title": "Loops", "exercises": [] }
    ]"#;

    #[test]
    fn parses_lessons_in_order() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();

        assert_eq!(catalog.len(), 2);
        let ids: Vec<_> = catalog.lessons().iter().map(|l| l.id.clone()).collect();
        assert_eq!(ids, vec!["variables", "loops"]);
    }

    #[test]
    fn lookup_finds_lesson_by_id() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();

        let lesson = catalog.lookup("variables").unwrap();
        assert_eq!(lesson.title, "Variables");
        assert_eq!(lesson.exercises.len(), 2);
    }

    #[test]
    fn lookup_missing_lesson_returns_none() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();
        assert!(catalog.lookup("Lesson 2").is_none());
    }

    #[test]
    fn next_after_follows_catalog_order() {
        let catalog = StaticCatalog::from_json_str(CATALOG).unwrap();

        assert_eq!(catalog.next_after("variables").unwrap().id, "loops");
        assert!(catalog.next_after("loops").is_none());
        assert!(catalog.next_after("unknown").is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let lessons = vec![Lesson::new("a", "A"), Lesson::new("a", "Again")];
        let err = StaticCatalog::from_lessons(lessons).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateLesson(id) if id == "a"));
    }

    #[test]
    fn empty_ids_are_rejected() {
        let lessons = vec![Lesson::new("a", "A"), Lesson::new("  ", "Blank")];
        let err = StaticCatalog::from_lessons(lessons).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId(1)));
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        let lesson = Lesson::new("a", "A").with_exercise(Exercise::multiple_choice(
            "Pick",
            vec!["only".to_string()],
            3,
            5,
        ));
        let err = StaticCatalog::from_lessons(vec![lesson]).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InvalidExercise { ref lesson, index: 0, .. } if lesson == "a"
        ));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = StaticCatalog::from_json_str("{ not a list }").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = StaticCatalog::from_path(file.path()).unwrap();
        assert!(catalog.lookup("loops").is_some());
    }

    #[test]
    fn from_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StaticCatalog::from_path(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
