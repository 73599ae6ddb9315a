//! Submission pipeline tying the transcript to reply generation.

use crate::error::CoreError;
use crate::events::{ChatEvent, EventSink, PipelineState};
use crate::latency::Latency;
use crate::random::{RandomSource, SeededRandom, ThreadRandom};
use crate::responder::{ReplyGenerator, Responder};
use kozi_config::{ChatConfig, KoziConfig};
use kozi_transcript::{Initialization, Message, Sender, TranscriptStorage, TranscriptStore};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a submission was dropped without touching the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty or whitespace only.
    EmptyInput,
    /// Another submission is still in flight.
    Busy,
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing happened.
    Ignored(IgnoreReason),
    /// The user message and a bot reply were appended.
    Replied {
        user: Message,
        reply: Message,
        /// The reply is the apology because generation failed.
        recovered: bool,
    },
}

/// A chat session: transcript, reply generator, and the busy flag guarding
/// the at-most-one-in-flight submission rule.
pub struct Chatbot {
    transcript: Mutex<TranscriptStore>,
    generator: Arc<dyn ReplyGenerator>,
    random: Arc<dyn RandomSource>,
    latency: Latency,
    apology_message: String,
    busy: AtomicBool,
    events: Option<Arc<dyn EventSink>>,
}

impl Chatbot {
    /// Bring the transcript up for this session and publish its contents.
    ///
    /// Persistence failures are logged; the session starts from memory.
    pub fn initialize(&self, restore: bool) -> Initialization {
        let (init, messages) = {
            let mut transcript = self.transcript.lock();
            let init = transcript.initialize(restore).unwrap_or_else(|err| {
                warn!("failed to persist initial transcript: {err}");
                Initialization::Fresh
            });
            (init, transcript.messages().to_vec())
        };
        info!(
            "chat session initialized (mode={:?}, messages={})",
            init,
            messages.len()
        );
        self.publish_snapshot(messages);
        init
    }

    /// Submit user input.
    ///
    /// Empty input and submissions made while another is in flight are
    /// ignored. Otherwise the trimmed input is appended, the simulated delay
    /// elapses, and a reply (or the apology when generation fails) is
    /// appended before the pipeline returns to idle.
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let prompt = input.trim();
        if prompt.is_empty() {
            debug!("ignoring empty submission");
            return SubmitOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        let Some(_busy) = BusyGuard::acquire(self) else {
            debug!("ignoring submission while sending");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        let user = self.record(Message::new(prompt, Sender::User));
        let delay = self.latency.sample(self.random.as_ref());
        debug!(
            "awaiting simulated latency (delay_ms={}, prompt_len={})",
            delay.as_millis(),
            prompt.len()
        );
        tokio::time::sleep(delay).await;

        let (content, recovered) = match self.generator.generate(prompt).await {
            Ok(reply) => (reply, false),
            Err(err) => {
                error!("error generating response: {err}");
                (self.apology_message.clone(), true)
            }
        };
        let reply = self.record(Message::new(content, Sender::Bot));
        SubmitOutcome::Replied {
            user,
            reply,
            recovered,
        }
    }

    /// Clear the transcript and reseed the welcome message.
    pub fn clear(&self) {
        let messages = {
            let mut transcript = self.transcript.lock();
            if let Err(err) = transcript.reset() {
                warn!("failed to persist cleared transcript: {err}");
            }
            transcript.messages().to_vec()
        };
        info!("chat cleared");
        self.publish_snapshot(messages);
    }

    /// Snapshot of the transcript in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.transcript.lock().messages().to_vec()
    }

    pub fn state(&self) -> PipelineState {
        if self.busy.load(Ordering::Acquire) {
            PipelineState::Sending
        } else {
            PipelineState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state() == PipelineState::Sending
    }

    /// Append a record, logging persistence failures, and announce it.
    fn record(&self, message: Message) -> Message {
        // Storage writes run under the transcript lock so the persisted
        // order always matches append order. Writes are a single small file.
        {
            let mut transcript = self.transcript.lock();
            if let Err(err) = transcript.push(message.clone()) {
                warn!(
                    "failed to persist transcript (sender={}): {err}",
                    message.sender().as_str()
                );
            }
        }
        self.emit(ChatEvent::MessageAppended(message.clone()));
        message
    }

    fn publish_snapshot(&self, messages: Vec<Message>) {
        self.emit(ChatEvent::Cleared);
        for message in messages {
            self.emit(ChatEvent::MessageAppended(message));
        }
    }

    fn emit(&self, event: ChatEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }
}

/// Holds the busy flag for one submission and releases it on every exit path.
struct BusyGuard<'a> {
    chatbot: &'a Chatbot,
}

impl<'a> BusyGuard<'a> {
    fn acquire(chatbot: &'a Chatbot) -> Option<Self> {
        chatbot
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        chatbot.emit(ChatEvent::StateChanged(PipelineState::Sending));
        Some(Self { chatbot })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.chatbot.busy.store(false, Ordering::Release);
        self.chatbot
            .emit(ChatEvent::StateChanged(PipelineState::Idle));
    }
}

/// Builder for a [`Chatbot`].
pub struct ChatbotBuilder {
    storage: Arc<dyn TranscriptStorage>,
    chat: ChatConfig,
    generator: Option<Arc<dyn ReplyGenerator>>,
    random: Option<Arc<dyn RandomSource>>,
    events: Option<Arc<dyn EventSink>>,
}

impl ChatbotBuilder {
    /// Start a builder over the given storage with default chat settings.
    pub fn new(storage: Arc<dyn TranscriptStorage>) -> Self {
        Self {
            storage,
            chat: ChatConfig::default(),
            generator: None,
            random: None,
            events: None,
        }
    }

    /// Seed a builder from config: chat settings, rule table, and RNG seed.
    pub fn from_config(
        config: &KoziConfig,
        storage: Arc<dyn TranscriptStorage>,
    ) -> Result<Self, CoreError> {
        let responder = Responder::from_config(&config.responder)?;
        let mut builder = Self::new(storage)
            .chat(config.chat.clone())
            .generator(Arc::new(responder));
        if let Some(seed) = config.responder.seed {
            // Offset so latency draws do not mirror reply draws.
            builder = builder.random(Arc::new(SeededRandom::new(seed.wrapping_add(1))));
        }
        Ok(builder)
    }

    /// Replace welcome, apology, and latency settings.
    pub fn chat(mut self, chat: ChatConfig) -> Self {
        self.chat = chat;
        self
    }

    /// Replace only the latency window.
    pub fn latency(mut self, latency: kozi_config::LatencyConfig) -> Self {
        self.chat.latency = latency;
        self
    }

    /// Replace the reply generator (defaults to the built-in responder).
    pub fn generator(mut self, generator: Arc<dyn ReplyGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Replace the random source used for latency and the default responder.
    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    /// Attach an event sink.
    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Chatbot {
        let random = self
            .random
            .unwrap_or_else(|| Arc::new(ThreadRandom) as Arc<dyn RandomSource>);
        let generator = self.generator.unwrap_or_else(|| {
            Arc::new(Responder::new(
                crate::rules::RuleTable::builtin(),
                random.clone(),
            )) as Arc<dyn ReplyGenerator>
        });
        Chatbot {
            transcript: Mutex::new(TranscriptStore::new(
                self.storage,
                self.chat.welcome_message,
            )),
            generator,
            random,
            latency: self.chat.latency.into(),
            apology_message: self.chat.apology_message,
            busy: AtomicBool::new(false),
            events: self.events,
        }
    }
}
