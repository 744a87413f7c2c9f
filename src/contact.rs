//! Contact form endpoint contract.
//!
//! The form posts `{ name, email, subject, message }` as JSON. The handler
//! validates it, composes a notification mail and hands it to a
//! [`MailTransport`]; the response is a status code plus a small JSON body:
//!
//! | Case | Status | Body |
//! |------|--------|------|
//! | Method other than POST | 405 | `{"message":"Method not allowed"}` |
//! | Any field missing or empty | 400 | `{"message":"All fields are required"}` |
//! | Delivered | 200 | `{"message":"Message sent successfully"}` |
//! | Transport failed | 500 | `{"message":"Failed to send message","error":"..."}` |
//!
//! A body that is not a JSON object is treated the same as one with every
//! field missing.
//!
//! Delivery itself (SMTP) lives behind the transport trait. [`SpoolTransport`]
//! writes each mail as JSON into a directory, which is enough for local use
//! and for a separate sender to pick up.

use crate::config::ContactConfig;
use log::{debug, error, info};
use maud::html;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("All fields are required")]
    MissingFields,
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A validated form submission. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Wire shape of the request body; anything may be missing.
#[derive(Debug, Default, Deserialize)]
struct RawSubmission {
    name: Option<String>,
    email: Option<String>,
    subject: Option<String>,
    message: Option<String>,
}

impl ContactSubmission {
    /// Parse a JSON request body.
    pub fn parse(body: &str) -> Result<Self, ContactError> {
        let raw = match serde_json::from_str::<serde_json::Value>(body) {
            // Only an object counts; serde would otherwise fill the struct
            // positionally from an array.
            Ok(value @ serde_json::Value::Object(_)) => {
                serde_json::from_value::<RawSubmission>(value).unwrap_or_else(|e| {
                    debug!("contact body has malformed fields: {e}");
                    RawSubmission::default()
                })
            }
            Ok(other) => {
                debug!("contact body is not a JSON object: {other}");
                RawSubmission::default()
            }
            Err(e) => {
                debug!("contact body is not JSON: {e}");
                RawSubmission::default()
            }
        };
        let field = |value: Option<String>| value.filter(|v| !v.is_empty());
        match (
            field(raw.name),
            field(raw.email),
            field(raw.subject),
            field(raw.message),
        ) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(Self {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(ContactError::MissingFields),
        }
    }
}

/// A composed notification mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Build the mail forwarded to the site owner.
pub fn compose_mail(submission: &ContactSubmission, config: &ContactConfig) -> OutgoingMail {
    let text = format!(
        "Name: {}\nEmail: {}\nSubject: {}\nMessage: {}\n",
        submission.name, submission.email, submission.subject, submission.message
    );
    let body = html! {
        h2 { "New Contact Form Submission" }
        p { strong { "Name:" } " " (submission.name) }
        p { strong { "Email:" } " " (submission.email) }
        p { strong { "Subject:" } " " (submission.subject) }
        p { strong { "Message:" } " " (submission.message) }
    };

    OutgoingMail {
        from: config.from.clone(),
        to: config.recipient.clone(),
        reply_to: submission.email.clone(),
        subject: format!("{}{}", config.subject_prefix, submission.subject),
        text,
        html: body.into_string(),
    }
}

/// Delivers composed mail.
pub trait MailTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), ContactError>;
}

/// Keeps mail in memory instead of delivering it.
#[derive(Debug, Default)]
pub struct DryRunTransport {
    sent: RefCell<Vec<OutgoingMail>>,
}

impl DryRunTransport {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.borrow().clone()
    }
}

impl MailTransport for DryRunTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), ContactError> {
        self.sent.borrow_mut().push(mail.clone());
        Ok(())
    }
}

/// Writes each mail as `<dir>/mail-<n>.json`.
#[derive(Debug)]
pub struct SpoolTransport {
    dir: PathBuf,
    counter: AtomicU64,
}

impl SpoolTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_path(&self) -> PathBuf {
        loop {
            let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
            let path = self.dir.join(format!("mail-{n:04}.json"));
            if !path.exists() {
                return path;
            }
        }
    }
}

impl MailTransport for SpoolTransport {
    fn send(&self, mail: &OutgoingMail) -> Result<(), ContactError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.next_path();
        fs::write(&path, serde_json::to_string_pretty(mail)?)?;
        info!("spooled mail to {}", path.display());
        Ok(())
    }
}

/// JSON response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status code plus body, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReply {
    pub status: u16,
    pub body: ContactResponse,
}

impl ContactReply {
    fn new(status: u16, message: &str, error: Option<String>) -> Self {
        Self {
            status,
            body: ContactResponse {
                message: message.to_string(),
                error,
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Handle one request to the contact endpoint.
pub fn handle_contact(
    method: &str,
    body: &str,
    config: &ContactConfig,
    transport: &dyn MailTransport,
) -> ContactReply {
    if !method.eq_ignore_ascii_case("POST") {
        return ContactReply::new(405, &ContactError::MethodNotAllowed.to_string(), None);
    }

    let submission = match ContactSubmission::parse(body) {
        Ok(s) => s,
        Err(e) => return ContactReply::new(400, &e.to_string(), None),
    };

    let mail = compose_mail(&submission, config);
    match transport.send(&mail) {
        Ok(()) => ContactReply::new(200, "Message sent successfully", None),
        Err(e) => {
            error!("Error sending email: {e}");
            ContactReply::new(500, "Failed to send message", Some(e.to_string()))
        }
    }
}
