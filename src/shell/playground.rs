//! "AI playground" panel. Nothing is inferred: the reply is assembled from a
//! template and streamed word by word to look like token output.

use rand::Rng;
use std::time::Duration;
use tokio::{sync::mpsc, time::sleep};

pub const DEFAULT_MODEL: &str = "folio-mini";
pub const DEFAULT_SYSTEM: &str = "You are a helpful assistant.";
const MAX_TEMPERATURE: f32 = 2.0;
const BASE_DELAY_MS: u64 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct PlaygroundRequest {
    pub prompt: String,
    pub system: String,
    pub model: String,
    pub temperature: f32,
}

impl PlaygroundRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: DEFAULT_SYSTEM.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
        }
    }

    /// Clamped to `0.0..=2.0`; NaN reads as 0.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        if self.temperature.is_nan() {
            0.0
        } else {
            self.temperature.clamp(0.0, MAX_TEMPERATURE)
        }
    }
}

fn style(temperature: f32) -> &'static str {
    if temperature < 0.5 {
        "precise"
    } else if temperature < 1.2 {
        "balanced"
    } else {
        "creative"
    }
}

/// Builds the full templated reply.
#[must_use]
pub fn compose(request: &PlaygroundRequest) -> String {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return "Enter a prompt to see a response.".to_string();
    }

    let system = request.system.trim();
    let system = if system.is_empty() {
        DEFAULT_SYSTEM
    } else {
        system
    };
    let temperature = request.temperature();

    format!(
        "[{model} | temperature {temperature:.1} | {style}] Following the instructions \"{system}\", \
         here is a response to \"{prompt}\": this panel is a front-end demo, so the answer is \
         generated from a template rather than a model. In a real deployment the prompt would be \
         sent to an inference API and the tokens streamed back just like this.",
        model = request.model.trim(),
        style = style(temperature),
    )
}

/// Streams the composed reply one word at a time with jittered pacing.
/// Dropping the receiver stops the stream.
#[must_use]
pub fn stream(request: &PlaygroundRequest) -> mpsc::Receiver<String> {
    let text = compose(request);
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        for (i, word) in text.split_whitespace().enumerate() {
            let chunk = if i == 0 {
                word.to_string()
            } else {
                format!(" {word}")
            };
            if tx.send(chunk).await.is_err() {
                break;
            }
            let jitter = rand::thread_rng().gen_range(0..=BASE_DELAY_MS);
            sleep(Duration::from_millis(BASE_DELAY_MS + jitter)).await;
        }
    });

    rx
}
