use crate::errors::AppError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use uuid::Uuid;

/// Lifecycle of a contact-form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    InProgress,
    Responded,
    Closed,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 4] = [
        InquiryStatus::New,
        InquiryStatus::InProgress,
        InquiryStatus::Responded,
        InquiryStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::InProgress => "in_progress",
            InquiryStatus::Responded => "responded",
            InquiryStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Invalid inquiry status '{}'. Expected one of: new, in_progress, responded, closed",
                    s
                ))
            })
    }
}

/// Row of the `inquiries` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    /// One of [`InquiryStatus`], stored as text.
    pub status: String,
    /// e.g. "AI Agents", "Automation", "IT Consulting".
    pub service_interest: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /api/v1/inquiries`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: String,
    pub message: String,
    pub service_interest: Option<String>,
}

impl NewInquiry {
    /// Checks required fields and returns a trimmed copy with a lowercased email.
    pub fn validated(self) -> Result<Self, AppError> {
        let name = required("name", &self.name)?;
        let subject = required("subject", &self.subject)?;
        let message = required("message", &self.message)?;

        let email = self.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(AppError::BadRequest(format!(
                "Invalid email address: {}",
                self.email
            )));
        }

        Ok(Self {
            name,
            email,
            phone: optional(self.phone),
            company: optional(self.company),
            subject,
            message,
            service_interest: optional(self.service_interest),
        })
    }
}

/// Body of `PUT /api/v1/inquiries/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InquiryChanges {
    pub status: Option<String>,
}

impl InquiryChanges {
    pub fn parsed_status(&self) -> Result<Option<InquiryStatus>, AppError> {
        self.status.as_deref().map(str::parse).transpose()
    }
}

/// Loose `local@domain.tld` check; deliverability is not verified.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
                .expect("email pattern is valid")
        })
        .is_match(email)
}

fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
