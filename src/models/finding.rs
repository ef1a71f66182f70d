use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn numeric_value(&self) -> u8 {
        match self {
            Severity::Critical => 4,
            Severity::High => 3,
            Severity::Medium => 2,
            Severity::Low => 1,
            Severity::Info => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    SqlInjection,
    Xss,
    SensitiveInfo,
}

impl FindingKind {
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::SqlInjection => Severity::Critical,
            FindingKind::Xss => Severity::High,
            FindingKind::SensitiveInfo => Severity::Medium,
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FindingKind::SqlInjection => "SQL Injection",
            FindingKind::Xss => "Cross-Site Scripting (XSS)",
            FindingKind::SensitiveInfo => "Sensitive Information Exposure",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoType {
    Email,
    Phone,
    Ssn,
    ApiKey,
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfoType::Email => "email",
            InfoType::Phone => "phone",
            InfoType::Ssn => "ssn",
            InfoType::ApiKey => "api_key",
        };
        write!(f, "{}", s)
    }
}

/// One suspected vulnerability instance. `payload` holds the attack string
/// for injection findings and the matching regex for exposure findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_type: Option<InfoType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

impl Finding {
    pub fn sql_injection(
        url: impl Into<String>,
        parameter: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::injection(FindingKind::SqlInjection, url, parameter, payload)
    }

    pub fn xss(
        url: impl Into<String>,
        parameter: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self::injection(FindingKind::Xss, url, parameter, payload)
    }

    pub fn sensitive_info(
        url: impl Into<String>,
        info_type: InfoType,
        pattern: impl Into<String>,
        matched: impl Into<String>,
    ) -> Self {
        Self {
            kind: FindingKind::SensitiveInfo,
            severity: FindingKind::SensitiveInfo.severity(),
            url: url.into(),
            parameter: None,
            payload: pattern.into(),
            info_type: Some(info_type),
            evidence: Some(matched.into()),
        }
    }

    fn injection(
        kind: FindingKind,
        url: impl Into<String>,
        parameter: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            url: url.into(),
            parameter: Some(parameter.into()),
            payload: payload.into(),
            info_type: None,
            evidence: None,
        }
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    /// One-line human description used by the reporters.
    pub fn describe(&self) -> String {
        match (self.kind, &self.parameter, self.info_type) {
            (FindingKind::SensitiveInfo, _, Some(info)) => {
                format!("{} exposed in response body", info)
            }
            (_, Some(param), _) => format!("Parameter '{}' with payload {}", param, self.payload),
            _ => self.payload.clone(),
        }
    }
}
