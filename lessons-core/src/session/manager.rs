//! SessionManager for running lesson sessions against shared progression
//!
//! SessionManager owns every active lesson session, looks lessons up in the
//! catalog, funnels XP into one [`SharedProgression`] and publishes
//! [`ProgressionEvent`]s. After each evaluated answer it schedules the gate
//! release on a tokio timer; ending a session is the only way to cancel it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::LessonCatalog;
use crate::error::SessionError;
use crate::events::{EventBus, ProgressionEvent};
use crate::exercise::{Answer, Exercise};
use crate::progression::{ProgressionSnapshot, SharedProgression, XpGain};
use crate::sequencer::{Completion, LessonSequencer, Progress, SubmitResult};

use super::state::{ActiveSession, SessionConfig, SessionId, SessionInfo};

type Sessions = Arc<RwLock<HashMap<SessionId, ActiveSession>>>;

/// Manages lesson sessions for one learner
pub struct SessionManager {
    /// Active sessions indexed by ID
    sessions: Sessions,
    /// Lesson content source
    catalog: Arc<dyn LessonCatalog>,
    /// Progression shared by all sessions
    progression: SharedProgression,
    /// Event bus shared by all sessions
    event_bus: Arc<dyn EventBus>,
    config: SessionConfig,
}

impl SessionManager {
    /// Create a new SessionManager
    pub fn new(
        catalog: Arc<dyn LessonCatalog>,
        progression: SharedProgression,
        event_bus: Arc<dyn EventBus>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            catalog,
            progression,
            event_bus,
            config,
        }
    }

    /// The lesson catalog
    pub fn catalog(&self) -> &Arc<dyn LessonCatalog> {
        &self.catalog
    }

    /// The shared progression handle
    pub fn progression(&self) -> &SharedProgression {
        &self.progression
    }

    /// The event bus
    pub fn event_bus(&self) -> &Arc<dyn EventBus> {
        &self.event_bus
    }

    /// Session settings
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Open a session on `lesson_id`.
    ///
    /// A lesson without exercises is completed (and recorded) right away.
    pub async fn start_session(&self, lesson_id: &str) -> Result<SessionId, SessionError> {
        let Some(lesson) = self.catalog.lookup(lesson_id) else {
            warn!(lesson_id, "Lesson not found");
            return Err(SessionError::LessonNotFound(lesson_id.to_string()));
        };

        let id = Uuid::new_v4().to_string();
        let total_exercises = lesson.len();
        let (sequencer, completion) = {
            let mut store = self.progression.lock().await;
            LessonSequencer::start(lesson, self.config.sequencer_options(), &mut store)
        };

        let mut sessions = self.sessions.write().await;
        self.event_bus
            .publish(ProgressionEvent::SessionStarted {
                session_id: id.clone(),
                lesson_id: lesson_id.to_string(),
                total_exercises,
            })
            .await;
        if let Some(completion) = &completion {
            self.publish_completion(&id, completion).await;
        }
        sessions.insert(id.clone(), ActiveSession::new(id.clone(), sequencer));

        info!(session_id = %id, lesson_id, "Started lesson session");
        Ok(id)
    }

    /// Submit an answer for the session's current exercise.
    ///
    /// Rejected submissions (gate locked, lesson complete) come back with
    /// `accepted == false` and change nothing.
    pub async fn submit(
        &self,
        session_id: &str,
        answer: &Answer,
    ) -> Result<SubmitResult, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        let result = {
            let mut store = self.progression.lock().await;
            session.sequencer.submit(answer, &mut store)
        };

        self.publish_submit(session_id, &result).await;

        if result.accepted {
            let attempt = session.begin_attempt();
            let delay = self.config.delay_for(result.correct);
            let task = self.schedule_release(session_id.to_string(), attempt, delay);
            session.set_release_task(task);
        }

        Ok(result)
    }

    /// Acknowledge feedback early, releasing the gate now.
    ///
    /// Returns true if the gate was locked.
    pub async fn release(&self, session_id: &str) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        let released = session.release_now();
        if released {
            self.event_bus
                .publish(ProgressionEvent::GateReleased {
                    session_id: session_id.to_string(),
                })
                .await;
        }
        Ok(released)
    }

    /// Wait until the session's gate is unlocked.
    ///
    /// Fails with `NotFound` if the session ends while waiting.
    pub async fn wait_released(&self, session_id: &str) -> Result<(), SessionError> {
        let mut rx = {
            let sessions = self.sessions.read().await;
            sessions
                .get(session_id)
                .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?
                .subscribe_lock()
        };

        rx.wait_for(|locked| !*locked)
            .await
            .map(|_| ())
            .map_err(|_| SessionError::NotFound(session_id.to_string()))
    }

    /// The exercise awaiting an answer, `None` once the lesson is complete
    pub async fn current_exercise(&self, session_id: &str) -> Result<Option<Exercise>, SessionError> {
        self.with_session(session_id, |s| s.sequencer.current_exercise().cloned())
            .await
    }

    /// Position within the lesson
    pub async fn progress(&self, session_id: &str) -> Result<Progress, SessionError> {
        self.with_session(session_id, |s| s.sequencer.progress())
            .await
    }

    /// Summary of one session
    pub async fn session_info(&self, session_id: &str) -> Result<SessionInfo, SessionError> {
        self.with_session(session_id, |s| s.info()).await
    }

    /// Summaries of all sessions, oldest first
    pub async fn list_sessions(&self) -> Vec<SessionInfo> {
        let mut infos: Vec<_> = self
            .sessions
            .read()
            .await
            .values()
            .map(|s| s.info())
            .collect();
        infos.sort_by_key(|info| info.started_at);
        infos
    }

    /// Discard a session and any pending release.
    ///
    /// Progression is untouched: XP already awarded stays, nothing partial
    /// is added.
    pub async fn end_session(&self, session_id: &str) -> Result<SessionInfo, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .remove(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        let info = session.info();
        drop(session);

        self.event_bus
            .publish(ProgressionEvent::SessionEnded {
                session_id: session_id.to_string(),
                completed: info.progress.is_complete(),
            })
            .await;

        debug!(session_id, "Ended lesson session");
        Ok(info)
    }

    /// Number of active sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Current progression projection
    pub async fn snapshot(&self) -> ProgressionSnapshot {
        self.progression.snapshot().await
    }

    async fn with_session<F, R>(&self, session_id: &str, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&ActiveSession) -> R,
    {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(session_id)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;
        Ok(f(session))
    }

    fn schedule_release(&self, session_id: SessionId, attempt: u64, delay: Duration) -> JoinHandle<()> {
        let sessions = Arc::clone(&self.sessions);
        let event_bus = Arc::clone(&self.event_bus);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut sessions = sessions.write().await;
            let released = sessions
                .get_mut(&session_id)
                .is_some_and(|s| s.release_scheduled(attempt));
            if released {
                debug!(session_id = %session_id, attempt, "Settle delay elapsed, gate released");
                event_bus
                    .publish(ProgressionEvent::GateReleased { session_id })
                    .await;
            }
        })
    }

    async fn publish_submit(&self, session_id: &str, result: &SubmitResult) {
        let session_id = session_id.to_string();

        if let Some(reason) = result.rejected {
            self.event_bus
                .publish(ProgressionEvent::SubmissionRejected { session_id, reason })
                .await;
            return;
        }

        self.event_bus
            .publish(ProgressionEvent::AnswerEvaluated {
                session_id: session_id.clone(),
                exercise_index: result.exercise_index,
                correct: result.correct,
                xp_awarded: result.xp_awarded,
            })
            .await;

        if let Some(gain) = result.reward {
            self.publish_gain(&session_id, gain).await;
        }
        if let Some(completion) = &result.completion {
            self.publish_completion(&session_id, completion).await;
        }
    }

    async fn publish_completion(&self, session_id: &str, completion: &Completion) {
        self.event_bus
            .publish(ProgressionEvent::LessonCompleted {
                session_id: session_id.to_string(),
                lesson_id: completion.lesson_id.clone(),
                first_time: completion.award.is_some(),
            })
            .await;

        if let Some(gain) = completion.award {
            self.publish_gain(session_id, gain).await;
        }
    }

    async fn publish_gain(&self, session_id: &str, gain: XpGain) {
        if gain.amount > 0 {
            self.event_bus
                .publish(ProgressionEvent::XpAwarded {
                    session_id: session_id.to_string(),
                    amount: gain.amount,
                    xp: gain.xp,
                    level: gain.level,
                })
                .await;
        }
        if gain.leveled_up() {
            self.event_bus
                .publish(ProgressionEvent::LevelUp {
                    session_id: session_id.to_string(),
                    from: gain.previous_level(),
                    to: gain.level,
                })
                .await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::events::MemoryEventBus;
    use crate::lesson::Lesson;

    fn catalog() -> Arc<dyn LessonCatalog> {
        let lessons = vec![
            Lesson::new("L1", "Variables")
                .with_exercise(Exercise::multiple_choice(
                    "What is a variable?",
                    vec!["A container".to_string(), "A loop".to_string()],
                    0,
                    10,
                ))
                .with_exercise(Exercise::free_text("Which name holds 10?", "x", 15)),
            Lesson::new("empty", "Empty"),
        ];
        Arc::new(StaticCatalog::from_lessons(lessons).unwrap())
    }

    fn manager_with(config: SessionConfig) -> (SessionManager, Arc<MemoryEventBus>) {
        let bus = Arc::new(MemoryEventBus::new(64));
        let bus_dyn: Arc<dyn EventBus> = bus.clone();
        let manager = SessionManager::new(catalog(), SharedProgression::default(), bus_dyn, config);
        (manager, bus)
    }

    fn manager() -> (SessionManager, Arc<MemoryEventBus>) {
        manager_with(SessionConfig::default())
    }

    // ==================== Start Tests ====================

    #[tokio::test]
    async fn start_session_for_unknown_lesson_fails() {
        let (manager, bus) = manager();

        let result = manager.start_session("Lesson 2").await;

        assert_eq!(
            result,
            Err(SessionError::LessonNotFound("Lesson 2".to_string()))
        );
        assert_eq!(manager.session_count().await, 0);
        assert_eq!(bus.current_seq(), 0);
    }

    #[tokio::test]
    async fn start_session_presents_first_exercise() {
        let (manager, _) = manager();

        let id = manager.start_session("L1").await.unwrap();

        let exercise = manager.current_exercise(&id).await.unwrap().unwrap();
        assert_eq!(exercise.prompt, "What is a variable?");
        assert_eq!(
            manager.progress(&id).await.unwrap(),
            Progress { index: 0, total: 2 }
        );
    }

    #[tokio::test]
    async fn empty_lesson_completes_immediately() {
        let (manager, bus) = manager();

        let id = manager.start_session("empty").await.unwrap();

        assert!(manager.current_exercise(&id).await.unwrap().is_none());
        assert!(manager.snapshot().await.is_completed("empty"));
        let completed = bus
            .session_events(&id)
            .await
            .into_iter()
            .filter(|(_, e)| matches!(e, ProgressionEvent::LessonCompleted { .. }))
            .count();
        assert_eq!(completed, 1);
    }

    // ==================== Submit Tests ====================

    #[tokio::test]
    async fn submit_to_unknown_session_fails() {
        let (manager, _) = manager();
        let result = manager.submit("nope", &Answer::Choice(0)).await;
        assert_eq!(result, Err(SessionError::NotFound("nope".to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_submit_before_release_is_rejected() {
        let (manager, bus) = manager();
        let id = manager.start_session("L1").await.unwrap();

        let first = manager.submit(&id, &Answer::Choice(0)).await.unwrap();
        let second = manager.submit(&id, &Answer::Choice(0)).await.unwrap();

        assert!(first.accepted);
        assert!(!second.accepted);
        assert_eq!(manager.snapshot().await.xp, 10);
        let rejected = bus
            .session_events(&id)
            .await
            .into_iter()
            .filter(|(_, e)| matches!(e, ProgressionEvent::SubmissionRejected { .. }))
            .count();
        assert_eq!(rejected, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn gate_releases_after_settle_delay() {
        let (manager, _) = manager();
        let id = manager.start_session("L1").await.unwrap();

        manager.submit(&id, &Answer::Choice(1)).await.unwrap();
        assert!(manager.session_info(&id).await.unwrap().locked);

        tokio::time::sleep(Duration::from_millis(699)).await;
        assert!(manager.session_info(&id).await.unwrap().locked);

        tokio::time::sleep(Duration::from_millis(2)).await;
        manager.wait_released(&id).await.unwrap();
        assert!(!manager.session_info(&id).await.unwrap().locked);
    }

    #[tokio::test(start_paused = true)]
    async fn correct_answer_uses_longer_delay() {
        let (manager, _) = manager();
        let id = manager.start_session("L1").await.unwrap();

        manager.submit(&id, &Answer::Choice(0)).await.unwrap();

        tokio::time::sleep(Duration::from_millis(750)).await;
        assert!(manager.session_info(&id).await.unwrap().locked);
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!manager.session_info(&id).await.unwrap().locked);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_release_cancels_pending_timer() {
        let (manager, bus) = manager();
        let id = manager.start_session("L1").await.unwrap();
        manager.submit(&id, &Answer::Choice(1)).await.unwrap();

        assert!(manager.release(&id).await.unwrap());
        assert!(!manager.release(&id).await.unwrap());

        // Next attempt must not be released by the first attempt's timer
        manager.submit(&id, &Answer::Choice(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(manager.session_info(&id).await.unwrap().locked);

        let releases = bus
            .session_events(&id)
            .await
            .into_iter()
            .filter(|(_, e)| matches!(e, ProgressionEvent::GateReleased { .. }))
            .count();
        assert_eq!(releases, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn full_walk_completes_and_publishes_events() {
        let (manager, bus) = manager();
        let id = manager.start_session("L1").await.unwrap();

        manager.submit(&id, &Answer::Choice(0)).await.unwrap();
        manager.wait_released(&id).await.unwrap();
        let last = manager.submit(&id, &Answer::text("x")).await.unwrap();

        assert!(last.lesson_completed());
        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.xp, 25);
        assert!(snapshot.is_completed("L1"));

        let kinds: Vec<_> = bus
            .session_events(&id)
            .await
            .into_iter()
            .map(|(_, e)| e)
            .filter(|e| {
                matches!(
                    e,
                    ProgressionEvent::AnswerEvaluated { .. }
                        | ProgressionEvent::LessonCompleted { .. }
                )
            })
            .collect();
        assert_eq!(kinds.len(), 3);
        assert!(matches!(
            kinds[2],
            ProgressionEvent::LessonCompleted {
                first_time: true,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn level_up_is_published() {
        let (manager, bus) = manager();
        manager.progression().add_xp(95).await;
        let id = manager.start_session("L1").await.unwrap();

        manager.submit(&id, &Answer::Choice(0)).await.unwrap();

        let level_ups: Vec<_> = bus
            .session_events(&id)
            .await
            .into_iter()
            .filter_map(|(_, e)| match e {
                ProgressionEvent::LevelUp { from, to, .. } => Some((from, to)),
                _ => None,
            })
            .collect();
        assert_eq!(level_ups, vec![(1, 2)]);
    }

    // ==================== End Tests ====================

    #[tokio::test(start_paused = true)]
    async fn end_session_mid_attempt_leaves_progression_alone() {
        let (manager, bus) = manager();
        let id = manager.start_session("L1").await.unwrap();
        manager.submit(&id, &Answer::Choice(0)).await.unwrap();
        let before = manager.snapshot().await;

        let info = manager.end_session(&id).await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(!info.progress.is_complete());
        assert_eq!(manager.snapshot().await, before);
        assert!(!before.is_completed("L1"));
        assert_eq!(manager.session_count().await, 0);
        assert!(matches!(
            manager.progress(&id).await,
            Err(SessionError::NotFound(_))
        ));

        let releases = bus
            .session_events(&id)
            .await
            .into_iter()
            .filter(|(_, e)| matches!(e, ProgressionEvent::GateReleased { .. }))
            .count();
        assert_eq!(releases, 0);
    }

    #[tokio::test]
    async fn list_sessions_reports_each_session() {
        let (manager, _) = manager();
        let a = manager.start_session("L1").await.unwrap();
        let b = manager.start_session("empty").await.unwrap();

        let infos = manager.list_sessions().await;

        assert_eq!(infos.len(), 2);
        let ids: Vec<_> = infos.iter().map(|i| i.id.clone()).collect();
        assert!(ids.contains(&a));
        assert!(ids.contains(&b));
    }
}
