use super::{Speech, SpeechCaps};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::debug;

/// Speech through external programs. The speak command receives the text as
/// its last argument; the listen command prints one transcript line.
pub struct CommandSpeech {
    speak_command: Option<Vec<String>>,
    listen_command: Option<Vec<String>>,
    current: Mutex<Option<Child>>,
}

impl CommandSpeech {
    pub fn new(speak_command: Option<&str>, listen_command: Option<&str>) -> Self {
        Self {
            speak_command: speak_command.and_then(split_command),
            listen_command: listen_command.and_then(split_command),
            current: Mutex::new(None),
        }
    }
}

fn split_command(command: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

#[async_trait]
impl Speech for CommandSpeech {
    fn available(&self) -> SpeechCaps {
        SpeechCaps {
            output: self.speak_command.is_some(),
            input: self.listen_command.is_some(),
        }
    }

    async fn speak(&self, text: &str) {
        let Some(parts) = &self.speak_command else {
            return;
        };

        let mut current = self.current.lock().await;
        if let Some(mut previous) = current.take() {
            if let Err(e) = previous.start_kill() {
                debug!(error = %e, "previous utterance already finished");
            }
        }

        let spawned = Command::new(&parts[0])
            .args(&parts[1..])
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => *current = Some(child),
            Err(e) => debug!(program = %parts[0], error = %e, "speech output unavailable"),
        }
    }

    async fn listen(&self) -> Option<String> {
        let parts = self.listen_command.as_ref()?;

        let output = match Command::new(&parts[0])
            .args(&parts[1..])
            .stdin(Stdio::inherit())
            .stderr(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!(program = %parts[0], error = %e, "speech input unavailable");
                return None;
            }
        };

        if !output.status.success() {
            debug!(status = %output.status, "speech input command failed");
            return None;
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_degrades_silently() {
        let speech = CommandSpeech::new(
            Some("portalchat-no-such-speaker --rate 150"),
            Some("portalchat-no-such-listener"),
        );
        assert_eq!(
            speech.available(),
            SpeechCaps {
                output: true,
                input: true
            }
        );
        speech.speak("hello").await;
        assert_eq!(speech.listen().await, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_listen_returns_first_line() {
        let speech = CommandSpeech::new(None, Some("echo heard you"));
        assert_eq!(speech.listen().await, Some("heard you".to_string()));
    }
}
