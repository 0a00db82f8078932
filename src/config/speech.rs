use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Speak every answer
    #[serde(default)]
    pub enabled: bool,
    /// e.g. `espeak -s 150`; the text is appended as the last argument
    #[serde(default)]
    pub speak_command: Option<String>,
    /// A program that prints one recognized line to stdout
    #[serde(default)]
    pub listen_command: Option<String>,
}
