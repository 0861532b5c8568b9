use std::fmt;

/// Kind of stored credential, as filtered by the backend secret listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretKind {
    Password,
    Htpasswd,
    Slack,
    PagerDuty,
    Amazon,
    Google,
    Alibaba,
    Azure,
}

impl SecretKind {
    /// Type string understood by the backend
    pub fn as_str(self) -> &'static str {
        match self {
            SecretKind::Password => "password",
            SecretKind::Htpasswd => "htpasswd",
            SecretKind::Slack => "slack",
            SecretKind::PagerDuty => "pagerduty",
            SecretKind::Amazon => "amazon",
            SecretKind::Google => "google",
            SecretKind::Alibaba => "alibaba",
            SecretKind::Azure => "azure",
        }
    }

    /// Human readable name used in prompts
    pub fn label(self) -> &'static str {
        match self {
            SecretKind::Password => "password",
            SecretKind::Htpasswd => "htpasswd",
            SecretKind::Slack => "Slack",
            SecretKind::PagerDuty => "PagerDuty",
            SecretKind::Amazon => "Amazon",
            SecretKind::Google => "Google",
            SecretKind::Alibaba => "Alibaba",
            SecretKind::Azure => "Azure",
        }
    }
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
