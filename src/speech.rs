//! Speech capture boundary: transcripts and recognizer error codes.

use std::fmt;

/// Lowercased recognized speech. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript(String);

impl Transcript {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reason a recognition cycle ended without a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    NoSpeech,
    Aborted,
    AudioCapture,
    NotAllowed,
    Network,
    ServiceNotAllowed,
    Other(String),
}

impl CaptureError {
    /// Map a recognizer reason code (e.g. `no-speech`) to its variant.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "no-speech" => CaptureError::NoSpeech,
            "aborted" => CaptureError::Aborted,
            "audio-capture" => CaptureError::AudioCapture,
            "not-allowed" => CaptureError::NotAllowed,
            "network" => CaptureError::Network,
            "service-not-allowed" => CaptureError::ServiceNotAllowed,
            other => CaptureError::Other(other.to_string()),
        }
    }

    /// Message shown on the display for this error.
    pub fn message(&self) -> String {
        match self {
            CaptureError::NoSpeech => "No speech detected".to_string(),
            CaptureError::Aborted => "Recognition canceled".to_string(),
            CaptureError::AudioCapture => "No microphone detected".to_string(),
            CaptureError::NotAllowed => "Microphone access denied".to_string(),
            CaptureError::Network => "Network error occurred".to_string(),
            CaptureError::ServiceNotAllowed => "Service not allowed".to_string(),
            CaptureError::Other(code) => format!("Error: {}", code),
        }
    }
}

/// One recognition cycle's result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    Transcript(Transcript),
    Error(CaptureError),
}

/// Parse a line from a line-oriented capture source.
///
/// `!error <code>` lines stand for a recognizer failure; blank lines yield `None`.
pub fn parse_capture_line(line: &str) -> Option<CaptureEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(code) = trimmed.strip_prefix("!error") {
        let code = code.trim();
        let code = if code.is_empty() { "start_error" } else { code };
        return Some(CaptureEvent::Error(CaptureError::from_code(code)));
    }
    Some(CaptureEvent::Transcript(Transcript::new(trimmed)))
}
