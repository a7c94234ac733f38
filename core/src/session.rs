use crate::error::SessionError;
use crate::traits::ChatMessage;
use serde::{Deserialize, Serialize};

/// One continuous conversation with a registered farmer.
///
/// Contact details are fixed at registration. The history only grows; the
/// agent loop appends a whole turn at once when the turn succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    thread_id: String,
    email: String,
    phone: String,
    history: Vec<ChatMessage>,
}

impl Session {
    pub fn new(email: impl Into<String>, phone: impl Into<String>) -> Result<Self, SessionError> {
        Self::with_thread_id(uuid::Uuid::new_v4().to_string(), email, phone)
    }

    pub fn with_thread_id(
        thread_id: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let email = email.into().trim().to_string();
        let phone = phone.into().trim().to_string();

        if email.is_empty() {
            return Err(SessionError::MissingEmail);
        }
        if phone.is_empty() {
            return Err(SessionError::MissingPhone);
        }

        Ok(Self {
            thread_id: thread_id.into(),
            email,
            phone,
            history: Vec::new(),
        })
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub(crate) fn append(&mut self, messages: impl IntoIterator<Item = ChatMessage>) {
        self.history.extend(messages);
    }
}
