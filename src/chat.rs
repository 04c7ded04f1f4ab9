//! Scripted ingredient chat.
//!
//! There is no language understanding here: every question gets the same
//! templated answer after a fixed "typing" delay.

use log::debug;
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

pub const DEFAULT_REPLY_TEMPLATE: &str =
    "This is a simulated response about the ingredient: {input}";
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Chatbot {
    delay: Duration,
    template: String,
    messages: Vec<ChatMessage>,
}

impl Default for Chatbot {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY, DEFAULT_REPLY_TEMPLATE)
    }
}

impl Chatbot {
    /// `template` may contain `{input}`, replaced by the user's message
    pub fn new(delay: Duration, template: impl Into<String>) -> Self {
        Self {
            delay,
            template: template.into(),
            messages: Vec::new(),
        }
    }

    /// Send a message and wait for the scripted reply
    ///
    /// Blank input is ignored and returns `None` right away.
    pub async fn send(&mut self, input: &str) -> Option<ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage {
            sender: Sender::User,
            text: input.to_string(),
        });

        debug!("Replying in {:?}", self.delay);
        sleep(self.delay).await;

        let reply = ChatMessage {
            sender: Sender::Bot,
            text: self.render_reply(input),
        };
        self.messages.push(reply.clone());
        Some(reply)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn render_reply(&self, input: &str) -> String {
        self.template.replace("{input}", input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_reply_after_fixed_delay() {
        let mut bot = Chatbot::default();
        let started = Instant::now();

        let reply = bot.send("Palm Oil").await.unwrap();

        assert!(started.elapsed() >= DEFAULT_REPLY_DELAY);
        assert_eq!(reply.sender, Sender::Bot);
        assert_eq!(
            reply.text,
            "This is a simulated response about the ingredient: Palm Oil"
        );
        assert_eq!(
            bot.messages(),
            &[
                ChatMessage {
                    sender: Sender::User,
                    text: "Palm Oil".to_string()
                },
                reply
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_input_is_ignored() {
        let mut bot = Chatbot::default();
        let started = Instant::now();

        assert!(bot.send("   \t").await.is_none());
        assert!(bot.send("").await.is_none());
        assert!(bot.messages().is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_template_and_clear() {
        let mut bot = Chatbot::new(Duration::from_millis(250), "Asked about {input}!");
        let reply = bot.send("whey").await.unwrap();
        assert_eq!(reply.text, "Asked about whey!");

        bot.send("salt").await.unwrap();
        assert_eq!(bot.messages().len(), 4);

        bot.clear();
        assert!(bot.messages().is_empty());
    }
}
