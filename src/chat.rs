use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const PROTEIN_RESPONSE: &str = "Great question! High-protein foods include: lean meats (chicken, turkey, lean beef), fish (salmon, tuna, cod), eggs, dairy products (Greek yogurt, cottage cheese), legumes (lentils, chickpeas, beans), nuts and seeds, and quinoa.";
const WEIGHT_LOSS_RESPONSE: &str = "Healthy weight loss involves: 1) Creating a moderate calorie deficit (500-750 calories/day), 2) Eating whole, nutrient-dense foods, 3) Regular exercise combining cardio and strength training, 4) Staying hydrated, 5) Getting adequate sleep, and 6) Being patient and consistent.";
const BREAKFAST_RESPONSE: &str = "For sustained energy, try: oatmeal with berries and nuts, Greek yogurt with fruit and granola, avocado toast with eggs, or a smoothie with protein powder, spinach, banana, and nut butter. Include protein, healthy fats, and complex carbs.";
const LOW_CARB_RESPONSE: &str = "Low-carb meal ideas: Grilled chicken with roasted vegetables, salmon with cauliflower rice, zucchini noodles with meat sauce, lettuce wrap tacos, egg-based dishes, cheese and vegetable omelets, and salads with protein.";
const DEFAULT_RESPONSE: &str = "I'm here to help with your nutrition questions! You can ask me about meal planning, specific foods, dietary goals, or nutrition advice. What would you like to know?";

/// Canned answers keyed by trigger phrase, scanned in declared order.
///
/// Kept as an ordered list rather than a map: when two triggers both occur in
/// a message, the one declared first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    triggers: Vec<(String, String)>,
    default: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TriggerEntry {
    trigger: String,
    response: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResponseTableDocument {
    triggers: Vec<TriggerEntry>,
    default: String,
}

impl ResponseTable {
    /// Builds a table from `(trigger, response)` pairs. Triggers are
    /// lower-cased so they can match the lower-cased input.
    pub fn new<I, T, R>(triggers: I, default: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (T, R)>,
        T: Into<String>,
        R: Into<String>,
    {
        Self {
            triggers: triggers
                .into_iter()
                .map(|(trigger, response)| (trigger.into().to_lowercase(), response.into()))
                .collect(),
            default: default.into(),
        }
    }

    /// The nutrition answers shipped with the planner.
    pub fn builtin() -> Self {
        Self::new(
            [
                ("what foods are high in protein", PROTEIN_RESPONSE),
                ("how can i lose weight healthily", WEIGHT_LOSS_RESPONSE),
                ("what's a good breakfast for energy", BREAKFAST_RESPONSE),
                ("low carb meal ideas", LOW_CARB_RESPONSE),
            ],
            DEFAULT_RESPONSE,
        )
    }

    /// Parses a table from its JSON form:
    /// `{"triggers": [{"trigger": "...", "response": "..."}], "default": "..."}`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: ResponseTableDocument =
            serde_json::from_str(json).context("Failed to parse chat response table")?;
        Ok(Self::new(
            document
                .triggers
                .into_iter()
                .map(|entry| (entry.trigger, entry.response)),
            document.default,
        ))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chat response table at {:?}", path))?;
        Self::from_json_str(&json)
    }

    /// Trigger phrases in declared order, suitable as quick-question prompts.
    pub fn quick_questions(&self) -> impl Iterator<Item = &str> {
        self.triggers.iter().map(|(trigger, _)| trigger.as_str())
    }

    pub fn default_response(&self) -> &str {
        &self.default
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Picks the canned answer for a message.
///
/// The message is lower-cased (nothing else) and the first trigger contained
/// in it selects the response; with no match the table's default is returned.
pub fn respond<'a>(user_text: &str, table: &'a ResponseTable) -> &'a str {
    let normalized = user_text.to_lowercase();
    match table
        .triggers
        .iter()
        .find(|(trigger, _)| normalized.contains(trigger.as_str()))
    {
        Some((trigger, response)) => {
            debug!(trigger = %trigger, "chat trigger matched");
            response
        }
        None => {
            debug!("no chat trigger matched, using default response");
            &table.default
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Local>,
}

impl ChatMessage {
    /// Hour and minute the message was sent, e.g. `09:41`.
    pub fn time_label(&self) -> String {
        self.sent_at.format("%H:%M").to_string()
    }
}

/// Conversation history for one session.
#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user message. Returns the trimmed text, or `None` when the
    /// message is blank and was ignored.
    pub fn push_user(&mut self, text: &str) -> Option<&str> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.push(Sender::User, trimmed);
        self.messages.last().map(|m| m.text.as_str())
    }

    pub fn push_bot(&mut self, text: &str) {
        self.push(Sender::Bot, text);
    }

    fn push(&mut self, sender: Sender, text: &str) {
        self.messages.push(ChatMessage {
            sender,
            text: text.to_string(),
            sent_at: Local::now(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}
