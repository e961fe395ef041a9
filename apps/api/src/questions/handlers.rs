//! Axum route handler for technical question retrieval.

use axum::{extract::State, Json};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::questions::formatter::TechnicalQuestion;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TechnicalQuestionsRequest {
    #[serde(default)]
    pub job_description: String,
    /// Absent means `DEFAULT_TOP_K`; an explicit `null` is kept and rejected.
    #[serde(default, deserialize_with = "present_value")]
    pub top_k: Option<Value>,
}

fn present_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct TechnicalQuestionsResponse {
    pub questions: Vec<TechnicalQuestion>,
}

/// POST /technical_questions
///
/// Returns the corpus problems most similar to the job description.
pub async fn handle_technical_questions(
    State(state): State<AppState>,
    Json(request): Json<TechnicalQuestionsRequest>,
) -> Result<Json<TechnicalQuestionsResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let top_k = parse_top_k(
        request.top_k.as_ref(),
        state.config.default_top_k,
        state.config.max_top_k,
    )?;

    let request_id = Uuid::new_v4();
    info!(%request_id, top_k, "Technical question search");

    let questions = state
        .questions
        .find_top_questions(&request.job_description, top_k)
        .await?;

    info!(%request_id, returned = questions.len(), "Technical question search complete");
    Ok(Json(TechnicalQuestionsResponse { questions }))
}

/// Coerces `top_k` like an integer cast: `3`, `"3"` and `2.5` (truncated to
/// 2) are accepted; an explicit `null`, fractional strings and non-scalars
/// are rejected. Must be positive; values above `max` are clamped.
fn parse_top_k(raw: Option<&Value>, default: usize, max: usize) -> Result<usize, AppError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    let value = match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::Validation("top_k must be an integer".to_string()))?;

    if value <= 0 {
        return Err(AppError::Validation("top_k must be greater than 0".to_string()));
    }

    let top_k = usize::try_from(value).unwrap_or(usize::MAX);
    if top_k > max {
        debug!("Clamping top_k {top_k} to {max}");
        return Ok(max);
    }
    Ok(top_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_top_k_uses_default() {
        assert_eq!(parse_top_k(None, 3, 50).unwrap(), 3);
    }

    #[test]
    fn test_null_top_k_rejected() {
        assert!(matches!(
            parse_top_k(Some(&Value::Null), 3, 50),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_numeric_string_accepted() {
        assert_eq!(parse_top_k(Some(&json!("5")), 3, 50).unwrap(), 5);
        assert_eq!(parse_top_k(Some(&json!(" 4 ")), 3, 50).unwrap(), 4);
    }

    #[test]
    fn test_float_is_truncated() {
        assert_eq!(parse_top_k(Some(&json!(2.5)), 3, 50).unwrap(), 2);
        assert_eq!(parse_top_k(Some(&json!(7.99)), 3, 50).unwrap(), 7);
    }

    #[test]
    fn test_float_truncating_to_zero_rejected() {
        assert!(parse_top_k(Some(&json!(0.5)), 3, 50).is_err());
    }

    #[test]
    fn test_non_integer_rejected() {
        assert!(matches!(
            parse_top_k(Some(&json!("2.5")), 3, 50),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_top_k(Some(&json!("three")), 3, 50),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            parse_top_k(Some(&json!([1])), 3, 50),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_request_keeps_explicit_null() {
        let absent: TechnicalQuestionsRequest =
            serde_json::from_value(json!({"job_description": "x"})).unwrap();
        assert_eq!(absent.top_k, None);

        let null: TechnicalQuestionsRequest =
            serde_json::from_value(json!({"job_description": "x", "top_k": null})).unwrap();
        assert_eq!(null.top_k, Some(Value::Null));
    }

    #[test]
    fn test_non_positive_rejected() {
        assert!(parse_top_k(Some(&json!(0)), 3, 50).is_err());
        assert!(parse_top_k(Some(&json!(-4)), 3, 50).is_err());
    }

    #[test]
    fn test_above_max_is_clamped() {
        assert_eq!(parse_top_k(Some(&json!(500)), 3, 50).unwrap(), 50);
    }
}
