//! Cognitive-training endpoints: result submission, progress and exercises.
//!
//! Scoring happens elsewhere; this module only moves payloads and turns
//! failures into messages fit for the user.

pub mod service;

pub use service::TrainingService;

use std::fmt;
use std::str::FromStr;

use crate::api::ApiError;

/// Exercise families that accept result submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseKind {
    MemoryMatch,
    CategoryNaming,
    WordRecall,
    LanguageFluency,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 4] = [
        ExerciseKind::MemoryMatch,
        ExerciseKind::CategoryNaming,
        ExerciseKind::WordRecall,
        ExerciseKind::LanguageFluency,
    ];

    /// URL segment used by the backend.
    pub fn slug(&self) -> &'static str {
        match self {
            ExerciseKind::MemoryMatch => "memory-match",
            ExerciseKind::CategoryNaming => "category-naming",
            ExerciseKind::WordRecall => "word-recall",
            ExerciseKind::LanguageFluency => "language-fluency",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| {
                let known: Vec<_> = ExerciseKind::ALL.iter().map(|k| k.slug()).collect();
                format!("unknown exercise '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// What the user was trying to do when a training call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SaveProgress(ExerciseKind),
    LoadProgress,
    GenerateExercise,
    LoadExercise,
}

/// User-facing message for a failed training call.
pub fn user_message(error: &ApiError, action: Action) -> &'static str {
    let status = error.status().map(|s| s.as_u16());
    match (action, status) {
        (_, Some(401)) => match action {
            Action::SaveProgress(_) => "Please log in to save your progress.",
            Action::LoadProgress => "Please log in to view your progress.",
            Action::GenerateExercise | Action::LoadExercise => "Please log in to access exercises.",
        },
        (Action::SaveProgress(kind), Some(400)) => match kind {
            ExerciseKind::MemoryMatch | ExerciseKind::CategoryNaming => {
                "Invalid game data. Please try playing the game again."
            }
            ExerciseKind::WordRecall | ExerciseKind::LanguageFluency => {
                "Invalid exercise data. Please try the exercise again."
            }
        },
        (Action::GenerateExercise, Some(400)) => "Invalid exercise parameters. Please try again.",
        (Action::LoadExercise, Some(404)) => {
            "Exercise not found. It may have expired or been removed."
        }
        (_, Some(code)) if code >= 500 => match action {
            Action::SaveProgress(_) => {
                "Server error. Your progress could not be saved. Please try again later."
            }
            Action::LoadProgress => {
                "Server error. Could not load your progress. Please try again later."
            }
            Action::GenerateExercise => {
                "Server error. Could not generate exercise. Please try again later."
            }
            Action::LoadExercise => "Server error. Could not load exercise. Please try again later.",
        },
        _ => match action {
            Action::SaveProgress(_) => {
                "Failed to save your progress. Please check your connection and try again."
            }
            Action::LoadProgress => {
                "Failed to load your progress. Please check your connection and try again."
            }
            Action::GenerateExercise => {
                "Failed to generate exercise. Please check your connection and try again."
            }
            Action::LoadExercise => {
                "Failed to load exercise. Please check your connection and try again."
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;

    use super::*;

    fn http(code: u16) -> ApiError {
        ApiError::from_status(StatusCode::from_u16(code).unwrap(), "")
    }

    #[test]
    fn test_exercise_kind_parse() {
        for kind in ExerciseKind::ALL {
            assert_eq!(kind.slug().parse::<ExerciseKind>().unwrap(), kind);
        }
        let err = "sudoku".parse::<ExerciseKind>().unwrap_err();
        assert!(err.contains("memory-match"));
    }

    #[test]
    fn test_user_message_by_status() {
        assert_eq!(
            user_message(&http(401), Action::SaveProgress(ExerciseKind::WordRecall)),
            "Please log in to save your progress."
        );
        assert_eq!(
            user_message(&http(400), Action::SaveProgress(ExerciseKind::WordRecall)),
            "Invalid exercise data. Please try the exercise again."
        );
        assert_eq!(
            user_message(&http(404), Action::LoadExercise),
            "Exercise not found. It may have expired or been removed."
        );
        assert_eq!(
            user_message(&http(502), Action::LoadProgress),
            "Server error. Could not load your progress. Please try again later."
        );
    }

    #[test]
    fn test_user_message_falls_back_to_connection_hint() {
        let timeout = ApiError::Timeout(Duration::from_secs(30));
        assert_eq!(
            user_message(&timeout, Action::GenerateExercise),
            "Failed to generate exercise. Please check your connection and try again."
        );
        // 404 only has a dedicated message when loading a single exercise
        assert_eq!(
            user_message(&http(404), Action::LoadProgress),
            "Failed to load your progress. Please check your connection and try again."
        );
    }

    #[test]
    fn test_rejected_game_results_name_the_game() {
        for kind in [ExerciseKind::MemoryMatch, ExerciseKind::CategoryNaming] {
            assert_eq!(
                user_message(&http(400), Action::SaveProgress(kind)),
                "Invalid game data. Please try playing the game again."
            );
        }
        assert_eq!(
            user_message(&http(400), Action::SaveProgress(ExerciseKind::LanguageFluency)),
            "Invalid exercise data. Please try the exercise again."
        );
    }
}
