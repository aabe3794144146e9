use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::ApiClient;
use crate::api::ApiError;

use super::ExerciseKind;

const TRAINING_BASE_PATH: &str = "/cognitive-training";

#[derive(Clone)]
pub struct TrainingService {
    client: ApiClient,
}

impl TrainingService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Submit finished-exercise results and return the backend's evaluation.
    pub async fn submit_results<R: Serialize + ?Sized>(
        &self,
        kind: ExerciseKind,
        results: &R,
    ) -> Result<Value, ApiError> {
        let path = format!("{}/{}/submit", TRAINING_BASE_PATH, kind.slug());
        debug!(exercise = %kind, "Submitting exercise results");
        self.client.post_json(&path, results).await
    }

    pub async fn progress(&self) -> Result<Value, ApiError> {
        self.client
            .get_json(&format!("{}/progress", TRAINING_BASE_PATH))
            .await
    }

    pub async fn generate_exercise<R: Serialize + ?Sized>(
        &self,
        request: &R,
    ) -> Result<Value, ApiError> {
        self.client
            .post_json(&format!("{}/exercises", TRAINING_BASE_PATH), request)
            .await
    }

    pub async fn exercise(&self, exercise_id: &str) -> Result<Value, ApiError> {
        if !is_valid_exercise_id(exercise_id) {
            return Err(ApiError::InvalidRequest(format!(
                "invalid exercise id: {:?}",
                exercise_id
            )));
        }
        self.client
            .get_json(&format!("{}/exercises/{}", TRAINING_BASE_PATH, exercise_id))
            .await
    }
}

/// Exercise ids are opaque tokens; restricting them to `[A-Za-z0-9_-]` keeps
/// them a single path segment (no separators, dot segments or escapes).
fn is_valid_exercise_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
