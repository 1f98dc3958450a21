// Decoders for the prediction API response bodies
use crate::application::prediction_source::PredictionError;
use crate::domain::prediction::{FlatAttritionRecord, SegmentedPrediction};
use serde_json::Value;

/// Decode `{ "<key>": { segment: { Historical, Predictions } } }`.
///
/// A body without `predictions_key` decodes to no segments.
pub fn decode_shrinkage(
    endpoint: &str,
    body: &str,
    predictions_key: &str,
) -> Result<SegmentedPrediction, PredictionError> {
    let value = parse(endpoint, body)?;
    let Value::Object(mut object) = value else {
        return Err(unexpected(endpoint, "a JSON object"));
    };

    match object.remove(predictions_key) {
        None | Some(Value::Null) => {
            tracing::debug!("{} response has no {:?} key", endpoint, predictions_key);
            Ok(SegmentedPrediction::new())
        }
        Some(segments @ Value::Object(_)) => serde_json::from_value(segments)
            .map_err(|_| unexpected(endpoint, "segments of Historical/Predictions records")),
        Some(_) => Err(unexpected(endpoint, "an object of segments")),
    }
}

/// Decode a JSON string whose content is itself a JSON array of records.
pub fn decode_attrition(endpoint: &str, body: &str) -> Result<Vec<FlatAttritionRecord>, PredictionError> {
    let Value::String(inner) = parse(endpoint, body)? else {
        return Err(unexpected(endpoint, "a JSON-encoded string"));
    };

    let records = parse(endpoint, &inner)?;
    if !records.is_array() {
        return Err(unexpected(endpoint, "an array of attrition records"));
    }

    serde_json::from_value(records)
        .map_err(|_| unexpected(endpoint, "records with date and Attrition Rate"))
}

fn parse(endpoint: &str, text: &str) -> Result<Value, PredictionError> {
    serde_json::from_str(text).map_err(|source| PredictionError::MalformedResponse {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn unexpected(endpoint: &str, expected: &'static str) -> PredictionError {
    PredictionError::UnexpectedShape {
        endpoint: endpoint.to_string(),
        expected,
    }
}
