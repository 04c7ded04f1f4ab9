use dilloscan::{ChatMessage, Chatbot, ScanConfig, Sender};
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_conversation_history() {
    let mut bot = Chatbot::new(Duration::from_millis(500), "Re: {input}");

    let started = Instant::now();
    bot.send("Sugar").await.unwrap();
    bot.send("  ").await;
    bot.send("Palm Oil").await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(1000));

    let transcript: Vec<(Sender, &str)> = bot
        .messages()
        .iter()
        .map(|m| (m.sender, m.text.as_str()))
        .collect();
    assert_eq!(
        transcript,
        vec![
            (Sender::User, "Sugar"),
            (Sender::Bot, "Re: Sugar"),
            (Sender::User, "Palm Oil"),
            (Sender::Bot, "Re: Palm Oil"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_chatbot_from_default_config() {
    let mut bot = ScanConfig::default().chatbot();
    let reply = bot.send("whey protein").await.unwrap();
    assert_eq!(
        reply,
        ChatMessage {
            sender: Sender::Bot,
            text: "This is a simulated response about the ingredient: whey protein".to_string(),
        }
    );
}

#[test]
fn test_messages_serialize_with_lowercase_sender() {
    let message = ChatMessage {
        sender: Sender::User,
        text: "salt".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&message).unwrap(),
        serde_json::json!({"sender": "user", "text": "salt"})
    );
}
