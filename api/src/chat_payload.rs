use advisor::{ConversationTurn, GenerationParams};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl ChatRequest {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

fn default_temperature() -> f32 {
    GenerationParams::default().temperature
}

fn default_top_p() -> f32 {
    GenerationParams::default().top_p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_payload_fills_defaults() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();

        assert_eq!(request.message, "hello");
        assert!(request.history.is_empty());
        let params = request.generation_params();
        assert_eq!(params.max_tokens, None);
        assert!((params.temperature - 0.7).abs() < f32::EPSILON);
        assert!((params.top_p - 0.9).abs() < f32::EPSILON);
    }

    #[test]
    fn full_payload_round_trips() {
        let request: ChatRequest = serde_json::from_str(
            r#"{
                "message": "next",
                "history": [{"user": "hi", "assistant": "hello"}],
                "max_tokens": 80,
                "temperature": 0.2,
                "top_p": 0.5
            }"#,
        )
        .unwrap();

        assert_eq!(request.history.len(), 1);
        assert_eq!(request.history[0].assistant, "hello");
        assert_eq!(request.generation_params().max_tokens, Some(80));
    }
}
