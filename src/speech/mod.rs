mod command;

pub use command::CommandSpeech;

use async_trait::async_trait;
use std::sync::Arc;

/// Which halves of speech the platform supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeechCaps {
    pub output: bool,
    pub input: bool,
}

/// Speech output and input. Implementations never fail loudly: a missing
/// capability turns the call into a no-op.
#[async_trait]
pub trait Speech: Send + Sync {
    fn available(&self) -> SpeechCaps;

    /// Start speaking `text`, cutting off whatever is being spoken.
    /// Returns once the utterance has started.
    async fn speak(&self, text: &str);

    /// Capture a single utterance.
    async fn listen(&self) -> Option<String>;
}

/// Used when no speech backend is configured.
pub struct NoSpeech;

#[async_trait]
impl Speech for NoSpeech {
    fn available(&self) -> SpeechCaps {
        SpeechCaps::default()
    }

    async fn speak(&self, _text: &str) {}

    async fn listen(&self) -> Option<String> {
        None
    }
}

/// `CommandSpeech` when at least one command is set, `NoSpeech` otherwise.
pub fn speech_from_commands(
    speak_command: Option<&str>,
    listen_command: Option<&str>,
) -> Arc<dyn Speech> {
    let speech = CommandSpeech::new(speak_command, listen_command);
    let caps = speech.available();
    if caps.output || caps.input {
        Arc::new(speech)
    } else {
        Arc::new(NoSpeech)
    }
}
