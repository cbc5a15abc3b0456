//! Response schemas for the LLM-backed endpoints.
//!
//! Model output is deserialized straight into these types; unknown fields,
//! missing required fields and wrong types are all rejected.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

/// A schema the model is asked to produce. `validate` covers the rules serde
/// cannot express.
pub trait ModelOutput: DeserializeOwned {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzeResponse {
    pub improvement_suggestions: Vec<String>,
    #[serde(deserialize_with = "integral_score")]
    pub fit_score: i64,
    pub fit_reason: String,
    pub expected_salary_note: String,
}

impl AnalyzeResponse {
    /// Placeholder recorded for a batch item that could not be analyzed.
    pub fn failed(err: &AppError) -> Self {
        Self {
            improvement_suggestions: vec!["Processing failed.".to_string()],
            fit_score: 0,
            fit_reason: format!("Error: {err}"),
            expected_salary_note: "N/A".to_string(),
        }
    }
}

impl ModelOutput for AnalyzeResponse {
    fn validate(&self) -> Result<(), String> {
        if !(0..=100).contains(&self.fit_score) {
            return Err(format!(
                "fit_score must be between 0 and 100, got {}",
                self.fit_score
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractResponse {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    pub summary: Option<String>,
}

impl ModelOutput for ExtractResponse {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalyzeItem {
    pub filename: String,
    pub result: AnalyzeResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalyzeResponse {
    pub job_description: String,
    pub results: Vec<BatchAnalyzeItem>,
}

/// Accepts `85` and `85.0`, rejects `85.5` and non-numbers.
fn integral_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = number.as_i64() {
        return Ok(n);
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(D::Error::custom(format!(
            "fit_score must be an integer, got {number}"
        ))),
    }
}
