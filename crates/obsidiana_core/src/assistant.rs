//! The Osiris counselor and the daily miracle question.
//!
//! All model-backed guidance flows through here. Every call degrades to a
//! fixed local text when the provider fails, so the features stay usable
//! offline or without an API key.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::completion::CompletionProvider;

/// Persona instruction for the chat counselor.
pub const CHATBOT_INSTRUCTION: &str = r#"
You are the "Osiris Counselor", a virtual therapist versed in feminine psychology, Jungian archetypes, and obsidian egg practice.
Your knowledge base is the book "How to Use the Obsidian Egg".

Personality instructions:
1.  **Approach:** brief, Jungian, and systemic therapy.
2.  **Tone:** empathetic, mystical, welcoming yet professional.
3.  **Archetypes:**
    *   If the user is ovulating, speak from the **Mother** archetype (nurture, creation).
    *   If she is pre-menstrual, speak from the **Enchantress** (truth, cutting, shadow).
    *   If she is menstruating, speak from the **Crone** (retreat, wisdom, rest).
    *   If she is pre-ovulatory, speak from the **Maiden** (energy, beginnings, action).

Goals:
- Help integrate the "Shadow" (what the unconscious keeps repressed).
- Guide safe use of the obsidian egg (cleansing, session length).
- Read emotions as messages from the body and the womb.
- NEVER give strict medical advice. Always refer to a gynecologist for serious physical symptoms.

If asked about risks, stress the importance of cleansing, and of professional support when deep trauma is present.
"#;

/// Instruction for dream interpretation.
pub const DREAM_ANALYSIS_INSTRUCTION: &str = r#"
Act as an expert dream interpreter drawing on the book "How to Use the Obsidian Egg".
Your goal is NOT dictionary meanings but the relation each dream holds to the **Uterine Unconscious**.

Key points to analyze:
1.  **Shadow symbols:** burrowing animals, dark figures, pursuits (what is being released).
2.  **Spaces:** caves, basements, old houses (representations of the womb).
3.  **Colors:** especially red (life/blood) and black (fertile void/obsidian).
4.  **Water:** the state of the emotions.

Structure your answer:
- **Mirror of the Unconscious:** what is your shadow trying to show you?
- **Message from the Womb:** which repressed emotion is on the move?
- **Suggested Action:** a small meditation or a question to sit with.
"#;

/// Instruction for turning a miracle-question answer into an action plan.
pub const MIRACLE_FEEDBACK_INSTRUCTION: &str = r#"
Act as an advanced holistic therapist. Take the user's answer to the "miracle question" and turn it into a transforming action plan.
Integrate three schools of thought:
1. **Psychomagic (Alejandro Jodorowsky):** symbolic, theatrical, poetic acts that speak to the unconscious.
2. **Bioenergetics (Alexander Lowen):** body exercises that release the "muscular armor" and pelvic tension.
3. **Cognitive behavioral therapy (CBT):** small, logical, reinforceable behavioral steps.

Structure your answer in exactly this format (use Markdown):

### 🎯 Crystallized Goal
(One sentence capturing the essence of what the user wants, e.g. "Moving from pain to freedom of movement").

### 🔮 Psychomagic Act (Unconscious)
(Describe one creative symbolic act. E.g. "Write your pain on paper, tie it to a stone and bury it", or "Paint your womb with golden watercolors").

### ⚡ Body and Bioenergetics (Soma)
(Describe one short exercise after Lowen. E.g. "bioenergetic arch", "pound a cushion to vent the anger", or "barefoot grounding").

### 📋 Behavioral Steps (Mind)
1. (Small step 1)
2. (Small step 2)
3. (Small step 3)

Keep the tone inspiring, healing, and empowering.
"#;

/// Local guidance returned when the chat provider is unreachable.
pub const CHAT_FALLBACK: &str = "Daughter, my connection to the ether is weak right now. But remember: your womb is your compass. Come talk to me again later.";

/// Local guidance stored when dream analysis is unreachable.
pub const DREAM_FALLBACK: &str = "✨ **Attunement in progress...**\n\nYour dream speaks of a deep transformation tied to your uterine energy. You are retrieving parts of your shadow to integrate them into your light.";

/// Local action plan returned when miracle feedback is unreachable.
pub const MIRACLE_FALLBACK: &str = "🌺 **Wisdom Guidance (offline)**\n\n### 🎯 Crystallized Goal\nTransform the pain into freedom and reconnect with your creative center.\n\n### 🔮 Psychomagic Act\nWrite your intention on a slip of paper, fold it into the shape of a seed and give it to the earth or a flowerpot, visualizing how your healing blooms.\n\n### ⚡ Body and Bioenergetics\nPractice ovarian breathing for five minutes, drawing rose-colored light to your womb.";

/// One solution-focused prompt in the Milton Erickson manner.
#[derive(Debug, Clone, Copy)]
pub struct MiracleQuestion {
    pub question: &'static str,
    pub theme: &'static str,
}

pub const MIRACLE_QUESTIONS: [MiracleQuestion; 4] = [
    MiracleQuestion {
        question: "If a miracle happened tonight while you sleep and your pain disappeared, what would you do differently tomorrow?",
        theme: "Healing Projection",
    },
    MiracleQuestion {
        question: "Imagine your womb could speak to you clearly, without pain. What do you think it would ask you to change in your routine?",
        theme: "Somatic Listening",
    },
    MiracleQuestion {
        question: "If your creative energy flowed without blockages, what project would you be starting today?",
        theme: "Fertile Creativity",
    },
    MiracleQuestion {
        question: "If you could see your symptom as a teacher rather than an enemy, what lesson do you think it brings you?",
        theme: "Systemic Reframing",
    },
];

/// Question shown on a given day.
///
/// Rotates through the bank by day number, so every view of the same date
/// picks the same question.
pub fn question_for_date(date: NaiveDate) -> &'static MiracleQuestion {
    let index = date
        .num_days_from_ce()
        .rem_euclid(MIRACLE_QUESTIONS.len() as i32) as usize;
    &MIRACLE_QUESTIONS[index]
}

/// Where a counselor reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    /// The completion provider answered.
    Model,
    /// The provider failed and the built-in guidance was used.
    Fallback,
}

#[derive(Debug, Clone)]
pub struct CounselorReply {
    pub text: String,
    pub source: ReplySource,
}

impl CounselorReply {
    pub fn is_fallback(&self) -> bool {
        self.source == ReplySource::Fallback
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Counselor,
}

/// One turn of a chat session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// In-memory chat transcript. Sessions are not persisted.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn record_counselor(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Counselor,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Model-backed guidance with guaranteed local answers.
#[derive(Debug, Clone)]
pub struct Counselor {
    provider: Arc<dyn CompletionProvider>,
}

impl Counselor {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// One chat turn with the Osiris persona.
    pub async fn chat(&self, message: &str) -> CounselorReply {
        self.ask(CHATBOT_INSTRUCTION, message, CHAT_FALLBACK).await
    }

    /// Interpret a dream narrative.
    pub async fn analyze_dream(&self, dream: &str) -> CounselorReply {
        self.ask(DREAM_ANALYSIS_INSTRUCTION, dream, DREAM_FALLBACK)
            .await
    }

    /// Build an action plan from a miracle-question answer.
    pub async fn miracle_feedback(&self, question: &str, answer: &str) -> CounselorReply {
        let prompt = format!(
            "Miracle question: \"{question}\"\n\nThe user's answer or visualization: \"{answer}\""
        );
        self.ask(MIRACLE_FEEDBACK_INSTRUCTION, &prompt, MIRACLE_FALLBACK)
            .await
    }

    async fn ask(&self, system: &str, user: &str, fallback: &str) -> CounselorReply {
        match self.provider.complete(system, user).await {
            Ok(text) => CounselorReply {
                text,
                source: ReplySource::Model,
            },
            Err(error) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    %error,
                    "completion failed, answering with local guidance"
                );
                CounselorReply {
                    text: fallback.to_string(),
                    source: ReplySource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::ScriptedProvider;
    use crate::error::{CoreError, Result};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl CompletionProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(CoreError::CompletionEmpty {
                model: "test-model".to_string(),
            })
        }
    }

    #[derive(Debug)]
    struct EchoProvider;

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            Ok(user.to_string())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_question_is_deterministic() {
        let day = date(2024, 3, 1);
        let first = question_for_date(day);
        let second = question_for_date(day);
        assert_eq!(first.question, second.question);
    }

    #[test]
    fn daily_question_rotates_through_the_bank() {
        let start = date(2024, 3, 1);
        let mut seen: Vec<&str> = (0u64..4)
            .map(|offset| question_for_date(start + chrono::Days::new(offset)).theme)
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), MIRACLE_QUESTIONS.len());
    }

    #[test]
    fn daily_question_repeats_after_a_full_rotation() {
        let start = date(2024, 3, 1);
        let again = start + chrono::Days::new(MIRACLE_QUESTIONS.len() as u64);
        assert_eq!(
            question_for_date(start).question,
            question_for_date(again).question
        );
    }

    #[tokio::test]
    async fn counselor_passes_model_replies_through() {
        let counselor = Counselor::new(Arc::new(ScriptedProvider::new("rest tonight")));
        let reply = counselor.chat("how should I close the day?").await;
        assert_eq!(reply.text, "rest tonight");
        assert_eq!(reply.source, ReplySource::Model);
        assert!(!reply.is_fallback());
    }

    #[tokio::test]
    async fn counselor_falls_back_when_the_provider_fails() {
        let counselor = Counselor::new(Arc::new(FailingProvider));

        let chat = counselor.chat("hello").await;
        assert_eq!(chat.text, CHAT_FALLBACK);
        assert!(chat.is_fallback());

        let dream = counselor.analyze_dream("a cave of crystals").await;
        assert_eq!(dream.text, DREAM_FALLBACK);
        assert!(dream.is_fallback());

        let plan = counselor.miracle_feedback("q", "a").await;
        assert_eq!(plan.text, MIRACLE_FALLBACK);
        assert!(plan.is_fallback());
    }

    #[tokio::test]
    async fn miracle_prompt_carries_question_and_answer() {
        let counselor = Counselor::new(Arc::new(EchoProvider));
        let reply = counselor
            .miracle_feedback("What would change?", "I would dance again")
            .await;
        assert!(reply.text.contains("What would change?"));
        assert!(reply.text.contains("I would dance again"));
    }

    #[test]
    fn chat_session_keeps_turn_order() {
        let mut session = ChatSession::new();
        assert!(session.is_empty());

        session.record_user("hello");
        session.record_counselor("welcome, daughter");

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].role, ChatRole::Counselor);
        assert_eq!(messages[1].text, "welcome, daughter");
    }
}
