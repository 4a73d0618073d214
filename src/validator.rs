use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use coursehub_core::AppError;

fn format_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();

    // Nested errors (e.g. videos[0].url) are not field errors at the top level
    if messages.is_empty() {
        messages.push(errors.to_string());
    }
    messages.sort();
    messages.join(", ")
}

/// Like [`Json`], but malformed bodies become 400 `bad_request` and bodies
/// that fail `validator` rules become 422 `validation_failed`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::unprocessable(anyhow!("{}", format_errors(&errors))))?;

        Ok(ValidatedJson(value))
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::bad_request(anyhow!("{} is required", field));
    }

    match rejection {
        JsonRejection::MissingJsonContentType(_) => AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        )),
        JsonRejection::JsonDataError(err) => {
            // serde's message names the offending field and why
            AppError::bad_request(anyhow!("Invalid request body: {}", err.body_text()))
        }
        _ => AppError::bad_request(anyhow!("Invalid request body")),
    }
}
