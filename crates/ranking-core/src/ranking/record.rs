use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Field names as stored in the record store.
pub mod fields {
    pub const GIVEN_NAME: &str = "Nombre";
    pub const FAMILY_NAME: &str = "Apellido";
    pub const EMAIL: &str = "Email";
    pub const SCORE: &str = "Puntaje";
    pub const EXTERNAL_USER_ID: &str = "UID";
}

/// One participant's entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: String,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    /// Raw score text as stored.
    pub score: String,
    pub external_user_id: String,
}

impl Record {
    /// Build a record from a stored object. Missing or non-text fields
    /// become empty strings; numeric fields keep their textual form.
    pub fn from_fields(id: &str, object: &Map<String, JsonValue>) -> Self {
        Self {
            id: id.to_string(),
            given_name: text_field(object, fields::GIVEN_NAME),
            family_name: text_field(object, fields::FAMILY_NAME),
            email: text_field(object, fields::EMAIL),
            score: text_field(object, fields::SCORE),
            external_user_id: text_field(object, fields::EXTERNAL_USER_ID),
        }
    }

    /// Numeric score used for ranking; 0 when the text is not a finite number.
    pub fn numeric_score(&self) -> f64 {
        parse_score(&self.score)
    }
}

pub fn parse_score(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        // `+ 0.0` folds -0.0 into 0.0 so equal scores compare equal
        Ok(value) if value.is_finite() => value + 0.0,
        _ => 0.0,
    }
}

fn text_field(object: &Map<String, JsonValue>, key: &str) -> String {
    match object.get(key) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
