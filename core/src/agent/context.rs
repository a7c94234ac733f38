use crate::session::Session;
use std::path::{Path, PathBuf};

const FARM_NOTES_FILE: &str = "FARM.md";
const FARM_NOTES_MAX_CHARS: usize = 8_000;

const IDENTITY: &str = "You are FarmGuard, an autonomous AI agricultural agent in Uganda. \
You help smallholder farmers with crops, livestock, weather and market questions.";

const AUTONOMOUS_RULES: &str = "## Autonomous Rules

1. Store important farmer data with store_farmer_profile as soon as the farmer shares it.
2. Retrieve memory with retrieve_memory before making decisions.
3. If a serious risk is detected, use send_alert automatically.
4. Escalate urgent risks by phone: send_alert places an AI phone call to the farmer.
5. Think step by step.";

/// Builds the per-call system prompt for a session.
pub struct ContextBuilder {
    workspace: Option<PathBuf>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self { workspace: None }
    }

    /// Reads optional local notes from `FARM.md` in `workspace`.
    pub fn with_workspace(mut self, workspace: impl AsRef<Path>) -> Self {
        self.workspace = Some(workspace.as_ref().to_path_buf());
        self
    }

    pub fn build_system_prompt(&self, session: &Session) -> String {
        let mut parts = vec![
            IDENTITY.to_string(),
            self.get_contact_context(session),
            AUTONOMOUS_RULES.to_string(),
            self.get_runtime_context(),
        ];

        if let Some(notes) = self.load_farm_notes() {
            parts.push(notes);
        }

        parts.join("\n\n---\n\n")
    }

    fn get_contact_context(&self, session: &Session) -> String {
        format!(
            "## Farmer Contact\n\nUser email: {}\nUser phone: {}",
            session.email(),
            session.phone()
        )
    }

    fn get_runtime_context(&self) -> String {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M (%A)");
        format!("## Runtime Context\n\n### Current Time\n{}", timestamp)
    }

    fn load_farm_notes(&self) -> Option<String> {
        let workspace = self.workspace.as_ref()?;
        let content = std::fs::read_to_string(workspace.join(FARM_NOTES_FILE)).ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }

        let notes = if trimmed.chars().count() > FARM_NOTES_MAX_CHARS {
            let truncated: String = trimmed.chars().take(FARM_NOTES_MAX_CHARS).collect();
            format!("{}\n\n[... truncated at {} chars]", truncated, FARM_NOTES_MAX_CHARS)
        } else {
            trimmed.to_string()
        };

        Some(format!("## Farm Notes ({})\n\n{}", FARM_NOTES_FILE, notes))
    }
}
