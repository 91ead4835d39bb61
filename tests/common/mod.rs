#![allow(dead_code)]

use async_trait::async_trait;
use recipe_pipeline::providers::{LlmProvider, ProviderError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-process provider that replays scripted replies in order
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<&str, &str>>) -> Self {
        ScriptedProvider {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|reply| reply.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            delay: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self::new(vec![Ok(reply)]))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::new(vec![Err(message)]))
    }

    /// Sleep before every reply
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _system: &str, prompt: &str) -> Result<String, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));
        reply.map_err(Into::into)
    }
}

pub const PANCAKES_TEXT: &str = "Pancakes\n\
    Serves 4\n\
    INGREDIENTS\n\
    2 cups flour\n\
    3 eggs\n\
    1 1/2 cups milk\n\
    INSTRUCTIONS\n\
    1. Whisk the eggs and milk\n\
    2. Fold in the flour\n\
    3. Fry in a hot pan";

pub const PANCAKES_JSON: &str = r#"{
  "name": "Pancakes",
  "description": "Fluffy breakfast pancakes",
  "ingredients": [
    {"quantity": 2, "unit": "cups", "name": "flour"},
    {"quantity": 3, "unit": "piece", "name": "eggs"},
    {"quantity": 1.5, "unit": "cup", "name": "milk"}
  ],
  "instructions": ["Whisk the eggs and milk", "Fold in the flour", "Fry in a hot pan"],
  "yieldQuantity": 4,
  "yieldUnit": "servings",
  "prepTimeMinutes": 10,
  "cookTimeMinutes": 15
}"#;
