//! Match session state machine.
//!
//! A session moves `Setup → Playing → Summary` and never back except through
//! [`Session::reset`]. The core holds no timers and does no sleeping: grading
//! returns an [`Advance`] telling the presentation adapter whether to move on
//! immediately or after a reveal delay, and the adapter drives the timed
//! countdown by calling [`Session::tick`] once per wall-clock second.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::error::SessionError;
use crate::generator;
use crate::settings::Settings;
use crate::types::{MatchDraft, MatchOutcome, Operator, Problem, RangeTable};

/// How long a fixed-count session shows feedback before the next question.
pub const FIXED_REVEAL_DELAY: Duration = Duration::from_millis(1000);

/// How long a timed session locks input after a wrong answer while the
/// correct answer is shown. Correct answers advance with no delay so fast
/// streaks are never penalized.
pub const WRONG_ANSWER_LOCKOUT: Duration = Duration::from_millis(800);

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Setup,
    Playing,
    Summary,
}

/// How the session is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    FixedCount { count: u32 },
    Timed { duration_secs: u32 },
}

/// Everything a session needs to start: the bounding mode, the enabled
/// operator pool, and the per-operator ranges.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: SessionMode,
    pub pool: Vec<Operator>,
    pub ranges: RangeTable,
}

impl SessionConfig {
    /// Build a config from persisted settings plus a chosen mode.
    pub fn from_settings(settings: &Settings, mode: SessionMode) -> Self {
        Self {
            mode,
            pool: settings.enabled_pool(),
            ranges: settings.range_table(),
        }
    }
}

/// What the adapter should do after an answer is graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Move on right away (timed mode, correct answer).
    Immediate,
    /// Show feedback for this long, then call [`Session::advance`].
    AfterDelay(Duration),
}

/// Outcome of one [`Session::submit`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Empty, non-numeric, locked, or out-of-phase input. No state changed.
    Ignored,
    Graded {
        correct: bool,
        correct_answer: i64,
        advance: Advance,
    },
}

/// A single practice match in progress.
pub struct Session {
    config: SessionConfig,
    phase: SessionPhase,
    /// Fixed-count: the pre-generated question list.
    problems: Vec<Problem>,
    current: usize,
    /// Timed: the one in-flight question.
    current_problem: Option<Problem>,
    /// Timed: graded questions, appended at grade time so a timer expiry
    /// still has exact per-question data.
    log: Vec<Problem>,
    score: u32,
    attempted: u32,
    remaining_secs: u32,
    locked: bool,
    started_at: Option<Instant>,
    question_started_at: Option<Instant>,
    draft: Option<MatchDraft>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: SessionPhase::Setup,
            problems: Vec::new(),
            current: 0,
            current_problem: None,
            log: Vec::new(),
            score: 0,
            attempted: 0,
            remaining_secs: 0,
            locked: false,
            started_at: None,
            question_started_at: None,
            draft: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> SessionMode {
        self.config.mode
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempted(&self) -> u32 {
        self.attempted
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The question currently presented, while playing.
    pub fn current_question(&self) -> Option<&Problem> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        match self.config.mode {
            SessionMode::FixedCount { .. } => self.problems.get(self.current),
            SessionMode::Timed { .. } => self.current_problem.as_ref(),
        }
    }

    /// One-based position within a fixed-count session, e.g. `(3, 10)`.
    pub fn position(&self) -> (usize, usize) {
        (self.current + 1, self.problems.len())
    }

    /// The finished match, once the session has reached the summary phase.
    pub fn draft(&self) -> Option<&MatchDraft> {
        self.draft.as_ref()
    }

    pub fn take_draft(&mut self) -> Option<MatchDraft> {
        self.draft.take()
    }

    /// Validate the config and transition `Setup → Playing`.
    ///
    /// A refused start leaves the session in setup; a session that already
    /// ran must be `reset()` before it can start again.
    pub fn start<R: Rng>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Setup {
            return Err(SessionError::AlreadyStarted);
        }
        if self.config.pool.is_empty() {
            return Err(SessionError::NoOperatorsEnabled);
        }
        match self.config.mode {
            SessionMode::FixedCount { count } => {
                if count == 0 {
                    return Err(SessionError::ZeroQuestionCount);
                }
                let problems: Result<Vec<_>, _> = (0..count)
                    .map(|_| generator::generate(rng, &self.config.pool, &self.config.ranges))
                    .collect();
                self.problems = problems?;
                self.current = 0;
            }
            SessionMode::Timed { duration_secs } => {
                if duration_secs == 0 {
                    return Err(SessionError::ZeroDuration);
                }
                self.remaining_secs = duration_secs;
                self.current_problem =
                    Some(generator::generate(rng, &self.config.pool, &self.config.ranges)?);
                self.log = Vec::new();
            }
        }
        self.score = 0;
        self.attempted = 0;
        self.locked = false;
        self.draft = None;
        let now = Instant::now();
        self.started_at = Some(now);
        self.question_started_at = Some(now);
        self.phase = SessionPhase::Playing;
        Ok(())
    }

    /// Grade raw input against the current question.
    ///
    /// Empty or non-numeric input, input while locked, and input outside the
    /// playing phase are rejected silently and change nothing.
    pub fn submit<R: Rng>(&mut self, rng: &mut R, raw: &str) -> Submission {
        if self.phase != SessionPhase::Playing || self.locked {
            return Submission::Ignored;
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Submission::Ignored;
        }
        let Ok(answer) = trimmed.parse::<i64>() else {
            return Submission::Ignored;
        };
        let elapsed_ms = self.question_elapsed_ms();

        match self.config.mode {
            SessionMode::FixedCount { .. } => {
                let Some(problem) = self.problems.get_mut(self.current) else {
                    return Submission::Ignored;
                };
                if problem.is_graded() {
                    return Submission::Ignored;
                }
                let correct = problem.grade(answer, elapsed_ms);
                let correct_answer = problem.correct_answer;
                self.attempted += 1;
                if correct {
                    self.score += 1;
                }
                // Released by advance() after the reveal delay.
                self.locked = true;
                Submission::Graded {
                    correct,
                    correct_answer,
                    advance: Advance::AfterDelay(FIXED_REVEAL_DELAY),
                }
            }
            SessionMode::Timed { .. } => {
                let Some(mut problem) = self.current_problem.take() else {
                    return Submission::Ignored;
                };
                let correct = problem.grade(answer, elapsed_ms);
                let correct_answer = problem.correct_answer;
                self.log.push(problem);
                self.attempted += 1;
                if correct {
                    self.score += 1;
                    self.next_timed_problem(rng);
                    Submission::Graded {
                        correct: true,
                        correct_answer,
                        advance: Advance::Immediate,
                    }
                } else {
                    self.locked = true;
                    Submission::Graded {
                        correct: false,
                        correct_answer,
                        advance: Advance::AfterDelay(WRONG_ANSWER_LOCKOUT),
                    }
                }
            }
        }
    }

    /// Release the lockout and move on: the next fixed-count question (or the
    /// summary after the last one), or a fresh timed problem. A no-op unless
    /// a graded answer is waiting.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        if self.phase != SessionPhase::Playing || !self.locked {
            return;
        }
        self.locked = false;
        match self.config.mode {
            SessionMode::FixedCount { .. } => {
                if self.current + 1 < self.problems.len() {
                    self.current += 1;
                    self.question_started_at = Some(Instant::now());
                } else {
                    self.finish_fixed();
                }
            }
            SessionMode::Timed { .. } => {
                self.next_timed_problem(rng);
            }
        }
    }

    /// Timed countdown, called once per elapsed wall-clock second.
    ///
    /// Reaching zero finishes the session exactly once; further ticks (or a
    /// tick racing the final submit) are no-ops because the phase has already
    /// left `Playing`.
    pub fn tick(&mut self) {
        if self.phase != SessionPhase::Playing {
            return;
        }
        if !matches!(self.config.mode, SessionMode::Timed { .. }) {
            return;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.finish_timed();
        }
    }

    /// Back to setup from any phase, synchronously discarding the lockout,
    /// the question log, the timer, and any in-flight ungraded question.
    pub fn reset(&mut self) {
        self.phase = SessionPhase::Setup;
        self.problems.clear();
        self.current = 0;
        self.current_problem = None;
        self.log.clear();
        self.score = 0;
        self.attempted = 0;
        self.remaining_secs = 0;
        self.locked = false;
        self.started_at = None;
        self.question_started_at = None;
        self.draft = None;
    }

    fn question_elapsed_ms(&self) -> u64 {
        self.question_started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    fn next_timed_problem<R: Rng>(&mut self, rng: &mut R) {
        // Pool was validated non-empty in start(), so generation cannot fail.
        if let Ok(problem) = generator::generate(rng, &self.config.pool, &self.config.ranges) {
            self.current_problem = Some(problem);
        }
        self.question_started_at = Some(Instant::now());
    }

    fn finish_fixed(&mut self) {
        let total = self.problems.len() as u32;
        let time_taken_secs = self
            .started_at
            .map(|t| t.elapsed().as_secs())
            .unwrap_or(0);
        self.draft = Some(MatchDraft {
            score: self.score,
            outcome: MatchOutcome::FixedCount {
                total,
                time_taken_secs,
            },
            questions: std::mem::take(&mut self.problems),
        });
        self.phase = SessionPhase::Summary;
    }

    fn finish_timed(&mut self) {
        let SessionMode::Timed { duration_secs } = self.config.mode else {
            return;
        };
        self.current_problem = None;
        self.locked = false;
        self.draft = Some(MatchDraft {
            score: self.score,
            outcome: MatchOutcome::Timed {
                attempted: self.attempted,
                timer_duration_secs: duration_secs,
            },
            questions: std::mem::take(&mut self.log),
        });
        self.phase = SessionPhase::Summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn fixed_session(count: u32) -> Session {
        Session::new(SessionConfig {
            mode: SessionMode::FixedCount { count },
            pool: Operator::ALL.to_vec(),
            ranges: RangeTable::default(),
        })
    }

    fn timed_session(duration_secs: u32) -> Session {
        Session::new(SessionConfig {
            mode: SessionMode::Timed { duration_secs },
            pool: Operator::ALL.to_vec(),
            ranges: RangeTable::default(),
        })
    }

    fn correct_answer(session: &Session) -> String {
        session
            .current_question()
            .expect("a current question")
            .correct_answer
            .to_string()
    }

    #[test]
    fn start_refused_with_no_operators() {
        let mut session = Session::new(SessionConfig {
            mode: SessionMode::FixedCount { count: 10 },
            pool: vec![],
            ranges: RangeTable::default(),
        });
        assert_eq!(
            session.start(&mut rng()),
            Err(SessionError::NoOperatorsEnabled)
        );
        assert_eq!(session.phase(), SessionPhase::Setup);
    }

    #[test]
    fn start_refused_with_zero_count_or_duration() {
        let mut rng = rng();
        assert_eq!(
            fixed_session(0).start(&mut rng),
            Err(SessionError::ZeroQuestionCount)
        );
        assert_eq!(
            timed_session(0).start(&mut rng),
            Err(SessionError::ZeroDuration)
        );
    }

    #[test]
    fn start_twice_is_refused_until_reset() {
        let mut rng = rng();
        let mut session = fixed_session(3);
        session.start(&mut rng).unwrap();
        assert_eq!(session.start(&mut rng), Err(SessionError::AlreadyStarted));
        session.reset();
        session.start(&mut rng).unwrap();
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn fixed_count_all_correct() {
        let mut rng = rng();
        let mut session = fixed_session(10);
        session.start(&mut rng).unwrap();

        for _ in 0..10 {
            let answer = correct_answer(&session);
            match session.submit(&mut rng, &answer) {
                Submission::Graded {
                    correct, advance, ..
                } => {
                    assert!(correct);
                    assert_eq!(advance, Advance::AfterDelay(FIXED_REVEAL_DELAY));
                }
                Submission::Ignored => panic!("submission was ignored"),
            }
            session.advance(&mut rng);
        }

        assert_eq!(session.phase(), SessionPhase::Summary);
        let draft = session.take_draft().expect("a finished match");
        assert_eq!(draft.score, 10);
        assert_eq!(
            draft.outcome,
            MatchOutcome::FixedCount {
                total: 10,
                time_taken_secs: 0
            }
        );
        assert_eq!(draft.questions.len(), 10);
        assert!(draft.questions.iter().all(|q| q.is_correct == Some(true)));
    }

    #[test]
    fn empty_and_non_numeric_input_change_nothing() {
        let mut rng = rng();
        let mut session = fixed_session(5);
        session.start(&mut rng).unwrap();

        assert_eq!(session.submit(&mut rng, ""), Submission::Ignored);
        assert_eq!(session.submit(&mut rng, "   "), Submission::Ignored);
        assert_eq!(session.submit(&mut rng, "twelve"), Submission::Ignored);
        assert_eq!(session.score(), 0);
        assert_eq!(session.attempted(), 0);
        assert_eq!(session.position(), (1, 5));
    }

    #[test]
    fn fixed_count_locks_until_advance() {
        let mut rng = rng();
        let mut session = fixed_session(5);
        session.start(&mut rng).unwrap();

        let answer = correct_answer(&session);
        assert!(matches!(
            session.submit(&mut rng, &answer),
            Submission::Graded { .. }
        ));
        assert!(session.is_locked());
        assert_eq!(session.submit(&mut rng, "1"), Submission::Ignored);
        assert_eq!(session.attempted(), 1);

        session.advance(&mut rng);
        assert!(!session.is_locked());
        assert_eq!(session.position(), (2, 5));
    }

    #[test]
    fn timed_correct_advances_immediately() {
        let mut rng = rng();
        let mut session = timed_session(60);
        session.start(&mut rng).unwrap();

        let first = session.current_question().unwrap().question.clone();
        let answer = correct_answer(&session);
        match session.submit(&mut rng, &answer) {
            Submission::Graded {
                correct, advance, ..
            } => {
                assert!(correct);
                assert_eq!(advance, Advance::Immediate);
            }
            Submission::Ignored => panic!("submission was ignored"),
        }
        assert!(!session.is_locked());
        assert_eq!(session.score(), 1);
        assert_eq!(session.attempted(), 1);
        // A fresh ungraded problem is already presented.
        let next = session.current_question().unwrap();
        assert!(!next.is_graded());
        assert!(next.question != first || next.user_answer.is_none());
    }

    #[test]
    fn timed_wrong_answer_locks_out_input() {
        let mut rng = rng();
        let mut session = timed_session(60);
        session.start(&mut rng).unwrap();

        let wrong = (session.current_question().unwrap().correct_answer + 1).to_string();
        match session.submit(&mut rng, &wrong) {
            Submission::Graded {
                correct, advance, ..
            } => {
                assert!(!correct);
                assert_eq!(advance, Advance::AfterDelay(WRONG_ANSWER_LOCKOUT));
            }
            Submission::Ignored => panic!("submission was ignored"),
        }
        assert!(session.is_locked());
        assert_eq!(session.submit(&mut rng, "5"), Submission::Ignored);

        session.advance(&mut rng);
        assert!(!session.is_locked());
        assert!(session.current_question().is_some());
    }

    #[test]
    fn timed_one_wrong_then_timer_expires() {
        // Scenario: duration 30, one wrong answer, then the countdown hits 0.
        let mut rng = rng();
        let mut session = timed_session(30);
        session.start(&mut rng).unwrap();

        let wrong = (session.current_question().unwrap().correct_answer + 1).to_string();
        session.submit(&mut rng, &wrong);
        for _ in 0..30 {
            session.tick();
        }

        assert_eq!(session.phase(), SessionPhase::Summary);
        let draft = session.draft().expect("a finished match");
        assert_eq!(draft.score, 0);
        assert_eq!(
            draft.outcome,
            MatchOutcome::Timed {
                attempted: 1,
                timer_duration_secs: 30
            }
        );
        assert_eq!(draft.questions.len(), 1);
        assert_eq!(draft.questions[0].is_correct, Some(false));
    }

    #[test]
    fn ticks_after_summary_are_noops() {
        let mut rng = rng();
        let mut session = timed_session(2);
        session.start(&mut rng).unwrap();
        session.tick();
        session.tick();
        assert_eq!(session.phase(), SessionPhase::Summary);

        let before = session.draft().cloned();
        session.tick();
        session.tick();
        assert_eq!(session.draft().cloned(), before);
        assert_eq!(session.submit(&mut rng, "1"), Submission::Ignored);
    }

    #[test]
    fn tick_ignores_fixed_count_sessions() {
        let mut rng = rng();
        let mut session = fixed_session(3);
        session.start(&mut rng).unwrap();
        session.tick();
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn reset_discards_in_flight_state() {
        let mut rng = rng();
        let mut session = timed_session(60);
        session.start(&mut rng).unwrap();
        let wrong = (session.current_question().unwrap().correct_answer + 1).to_string();
        session.submit(&mut rng, &wrong);
        assert!(session.is_locked());

        session.reset();
        assert_eq!(session.phase(), SessionPhase::Setup);
        assert!(!session.is_locked());
        assert_eq!(session.score(), 0);
        assert_eq!(session.attempted(), 0);
        assert_eq!(session.remaining_secs(), 0);
        assert!(session.draft().is_none());
        assert!(session.current_question().is_none());
        assert_eq!(session.submit(&mut rng, "5"), Submission::Ignored);
    }

    #[test]
    fn score_never_exceeds_attempted() {
        let mut rng = rng();
        let mut session = timed_session(60);
        session.start(&mut rng).unwrap();
        for i in 0..20 {
            let q = session.current_question().unwrap();
            let answer = if i % 3 == 0 {
                q.correct_answer + 1
            } else {
                q.correct_answer
            };
            session.submit(&mut rng, &answer.to_string());
            session.advance(&mut rng);
        }
        assert!(session.score() <= session.attempted());
        for _ in 0..60 {
            session.tick();
        }
        let draft = session.draft().unwrap();
        assert!(draft.score <= draft.outcome.questions_counted());
        assert_eq!(
            draft.outcome.questions_counted() as usize,
            draft.questions.len()
        );
    }
}
