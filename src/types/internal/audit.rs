use std::collections::HashMap;
use std::fmt;

/// Event types for audit logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    LoginSuccess,
    LoginFailure,
    UserRegistered,
    UserBlocked,
    UserUnblocked,
    UserApproved,
    Custom(String),
}

impl EventType {
    /// String representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailure => "login_failure",
            Self::UserRegistered => "user_registered",
            Self::UserBlocked => "user_blocked",
            Self::UserUnblocked => "user_unblocked",
            Self::UserApproved => "user_approved",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One append-only audit trail entry, built up before writing
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub actor_id: Option<String>,
    pub ip_address: Option<String>,
    pub data: HashMap<String, serde_json::Value>,
}

impl AuditEvent {
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            actor_id: None,
            ip_address: None,
            data: HashMap::new(),
        }
    }

    pub fn actor(mut self, actor_id: impl Into<String>) -> Self {
        self.actor_id = Some(actor_id.into());
        self
    }

    pub fn ip(mut self, ip_address: Option<String>) -> Self {
        self.ip_address = ip_address;
        self
    }

    /// Attach one detail field; values that fail to serialize are dropped
    pub fn detail(mut self, key: impl Into<String>, value: impl serde::Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.data.insert(key.into(), json_value);
        }
        self
    }
}
