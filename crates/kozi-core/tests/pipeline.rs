//! Submission pipeline integration tests.

use kozi_config::{ChatConfig, KoziConfig, LatencyConfig};
use kozi_core::{
    ChatEvent, Chatbot, ChatbotBuilder, IgnoreReason, PipelineState, SubmitOutcome,
};
use kozi_test_utils::{
    FailingGenerator, FailingStorage, FixedGenerator, RecordingEventSink, RecordingGenerator,
    SequenceRandom,
};
use kozi_transcript::{
    FileStorage, Initialization, MemoryStorage, Message, Sender, TranscriptStorage,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio::time::Instant;

const WELCOME: &str = "Hello! I'm your AI assistant. How can I help you today?";
const APOLOGY: &str = "I'm sorry, I encountered an error. Please try again.";

fn chatbot_with(
    storage: Arc<dyn TranscriptStorage>,
    events: Arc<RecordingEventSink>,
) -> ChatbotBuilder {
    ChatbotBuilder::new(storage)
        .random(Arc::new(SequenceRandom::constant(0)))
        .events(events)
}

fn contents(chatbot: &Chatbot) -> Vec<(Sender, String)> {
    chatbot
        .messages()
        .iter()
        .map(|message| (message.sender(), message.content().to_string()))
        .collect()
}

/// "Hi" maps to the greeting category and replies after the simulated delay.
#[tokio::test(start_paused = true)]
async fn greeting_round_trip_appends_user_then_bot() {
    let storage = Arc::new(MemoryStorage::default());
    let events = Arc::new(RecordingEventSink::new());
    let random = Arc::new(SequenceRandom::constant(0));
    let chatbot = chatbot_with(storage.clone(), events.clone())
        .random(random.clone())
        .build();
    assert_eq!(chatbot.initialize(false), Initialization::Fresh);

    let start = Instant::now();
    let outcome = chatbot.submit("  Hi  ").await;
    let elapsed = start.elapsed();

    let SubmitOutcome::Replied {
        user,
        reply,
        recovered,
    } = outcome
    else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert_eq!(user.content(), "Hi");
    assert_eq!(reply.content(), "Hello! How can I help you today?");
    assert!(!recovered);
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(3000));

    assert_eq!(
        contents(&chatbot),
        vec![
            (Sender::Bot, WELCOME.to_string()),
            (Sender::User, "Hi".to_string()),
            (Sender::Bot, "Hello! How can I help you today?".to_string()),
        ]
    );
    assert_eq!(storage.load().expect("load"), chatbot.messages());
    assert_eq!(chatbot.state(), PipelineState::Idle);
    // One draw for the delay, one for the reply.
    assert_eq!(random.draws(), 2);
}

/// Events arrive in transcript order, bracketed by the pipeline states.
#[tokio::test(start_paused = true)]
async fn submission_emits_state_and_message_events() {
    let events = Arc::new(RecordingEventSink::new());
    let chatbot = chatbot_with(Arc::new(MemoryStorage::default()), events.clone())
        .generator(Arc::new(FixedGenerator::new("pong")))
        .latency(LatencyConfig::none())
        .build();
    chatbot.initialize(false);
    events.take();

    let start = Instant::now();
    chatbot.submit("ping").await;
    assert_eq!(start.elapsed(), Duration::ZERO);

    let messages = chatbot.messages();
    assert_eq!(
        events.events(),
        vec![
            ChatEvent::StateChanged(PipelineState::Sending),
            ChatEvent::MessageAppended(messages[1].clone()),
            ChatEvent::MessageAppended(messages[2].clone()),
            ChatEvent::StateChanged(PipelineState::Idle),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn blank_input_is_ignored() {
    let events = Arc::new(RecordingEventSink::new());
    let chatbot = chatbot_with(Arc::new(MemoryStorage::default()), events.clone()).build();
    chatbot.initialize(false);
    events.take();

    for input in ["", "   ", "\n\t"] {
        assert_eq!(
            chatbot.submit(input).await,
            SubmitOutcome::Ignored(IgnoreReason::EmptyInput)
        );
    }

    assert_eq!(chatbot.messages().len(), 1);
    assert_eq!(events.events(), Vec::new());
}

/// A second submission while the first is in flight changes nothing.
#[tokio::test(start_paused = true)]
async fn submission_while_sending_is_ignored() {
    let generator = Arc::new(RecordingGenerator::new());
    let chatbot = Arc::new(
        chatbot_with(
            Arc::new(MemoryStorage::default()),
            Arc::new(RecordingEventSink::new()),
        )
        .generator(generator.clone())
        .build(),
    );
    chatbot.initialize(false);

    let first = tokio::spawn({
        let chatbot = chatbot.clone();
        async move { chatbot.submit("first").await }
    });
    while !chatbot.is_busy() {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        chatbot.submit("second").await,
        SubmitOutcome::Ignored(IgnoreReason::Busy)
    );
    assert_eq!(chatbot.messages().len(), 2);

    let outcome = first.await.expect("first submission");
    assert!(matches!(outcome, SubmitOutcome::Replied { .. }));
    assert_eq!(generator.prompts(), vec!["first".to_string()]);
    assert_eq!(
        contents(&chatbot),
        vec![
            (Sender::Bot, WELCOME.to_string()),
            (Sender::User, "first".to_string()),
            (Sender::Bot, "echo: first".to_string()),
        ]
    );
    assert!(!chatbot.is_busy());
}

/// Generation failures turn into the apology and still return to idle.
#[tokio::test(start_paused = true)]
async fn failed_generation_replies_with_apology() {
    let events = Arc::new(RecordingEventSink::new());
    let chatbot = chatbot_with(Arc::new(MemoryStorage::default()), events.clone())
        .generator(Arc::new(FailingGenerator))
        .build();
    chatbot.initialize(false);

    let outcome = chatbot.submit("hello").await;

    let SubmitOutcome::Replied {
        reply, recovered, ..
    } = outcome
    else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert!(recovered);
    assert_eq!(reply.content(), APOLOGY);
    assert_eq!(reply.sender(), Sender::Bot);
    assert_eq!(
        events.states(),
        vec![PipelineState::Sending, PipelineState::Idle]
    );

    let next = chatbot.submit("hello again").await;
    assert!(matches!(next, SubmitOutcome::Replied { .. }));
}

/// Storage failures never block the conversation.
#[tokio::test(start_paused = true)]
async fn storage_failures_keep_in_memory_transcript() {
    let storage = Arc::new(FailingStorage::new());
    let chatbot = chatbot_with(storage.clone(), Arc::new(RecordingEventSink::new()))
        .generator(Arc::new(FixedGenerator::new("still here")))
        .build();

    assert_eq!(chatbot.initialize(false), Initialization::Fresh);
    chatbot.submit("anyone?").await;

    assert_eq!(
        contents(&chatbot),
        vec![
            (Sender::Bot, WELCOME.to_string()),
            (Sender::User, "anyone?".to_string()),
            (Sender::Bot, "still here".to_string()),
        ]
    );
    assert!(storage.attempts() >= 3);
}

/// Restore only reads storage, so it still works when writes fail.
#[tokio::test(start_paused = true)]
async fn restore_from_unwritable_storage_adopts_persisted_records() {
    let persisted = vec![
        Message::new(WELCOME, Sender::Bot),
        Message::new("earlier question", Sender::User),
    ];
    let storage = Arc::new(FailingStorage::with_messages(persisted.clone()));
    let chatbot = chatbot_with(storage.clone(), Arc::new(RecordingEventSink::new())).build();

    assert_eq!(
        chatbot.initialize(true),
        Initialization::Restored { messages: 2 }
    );
    assert_eq!(chatbot.messages(), persisted);
    assert_eq!(storage.attempts(), 0);
}

#[tokio::test(start_paused = true)]
async fn clear_reseeds_welcome_message() {
    let storage = Arc::new(MemoryStorage::default());
    let events = Arc::new(RecordingEventSink::new());
    let chatbot = chatbot_with(storage.clone(), events.clone()).build();
    chatbot.initialize(false);
    chatbot.submit("help").await;
    events.take();

    chatbot.clear();
    chatbot.clear();

    let messages = chatbot.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content(), WELCOME);
    assert_eq!(storage.load().expect("load"), messages);
    let events = events.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[2..].to_vec(),
        vec![
            ChatEvent::Cleared,
            ChatEvent::MessageAppended(messages[0].clone()),
        ]
    );
}

/// Restarting discards the previous session unless restore is requested.
#[tokio::test(start_paused = true)]
async fn restart_discards_or_restores_file_transcript() {
    let temp = tempdir().expect("tempdir");
    let open = || -> Arc<dyn TranscriptStorage> {
        Arc::new(FileStorage::new(temp.path(), "koziChatHistory").expect("storage"))
    };

    let first = chatbot_with(open(), Arc::new(RecordingEventSink::new())).build();
    first.initialize(false);
    first.submit("thanks").await;
    let persisted = first.messages();
    drop(first);

    let restored = chatbot_with(open(), Arc::new(RecordingEventSink::new())).build();
    assert_eq!(
        restored.initialize(true),
        Initialization::Restored { messages: 3 }
    );
    assert_eq!(restored.messages(), persisted);
    drop(restored);

    let fresh = chatbot_with(open(), Arc::new(RecordingEventSink::new())).build();
    assert_eq!(fresh.initialize(false), Initialization::Fresh);
    assert_eq!(fresh.messages().len(), 1);
    assert_eq!(fresh.messages()[0].content(), WELCOME);
}

/// Configured messages and latency flow into the pipeline.
#[tokio::test(start_paused = true)]
async fn builder_from_config_applies_chat_settings() {
    let config = KoziConfig::builder()
        .chat(ChatConfig {
            welcome_message: "Welcome back.".to_string(),
            apology_message: "Oops.".to_string(),
            latency: LatencyConfig {
                min_ms: 5,
                max_ms: 5,
            },
        })
        .build();
    let chatbot = ChatbotBuilder::from_config(&config, Arc::new(MemoryStorage::default()))
        .expect("builder")
        .generator(Arc::new(FailingGenerator))
        .build();
    chatbot.initialize(false);

    let start = Instant::now();
    let outcome = chatbot.submit("hi").await;

    assert!(start.elapsed() >= Duration::from_millis(5));
    assert!(start.elapsed() < Duration::from_millis(100));
    assert_eq!(chatbot.messages()[0].content(), "Welcome back.");
    let SubmitOutcome::Replied { reply, .. } = outcome else {
        panic!("expected a reply, got {outcome:?}");
    };
    assert_eq!(reply.content(), "Oops.");
}
