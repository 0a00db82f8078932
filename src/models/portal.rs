use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Portal {
    pub id: String,
    pub title: String,
    pub start_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Portal {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start_prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_prompt: start_prompt.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Portals used when the config file declares none.
pub fn default_portals() -> Vec<Portal> {
    vec![
        Portal::new(
            "awakening",
            "Awakening",
            "Welcome me to the Awakening portal and give me today's first reflection.",
        )
        .with_description("A 30-day journey of daily reflections"),
        Portal::new(
            "strength",
            "Strength",
            "Start my strength track. Give me today's home workout in a few sentences.",
        )
        .with_description("Home training with a daily session"),
        Portal::new(
            "history",
            "History",
            "Open the history portal with one short story worth knowing today.",
        )
        .with_description("Short daily lessons"),
    ]
}
