use std::fmt;

use serde::Serialize;

/// Closed set of categories for failures reported by the remote engine.
///
/// Extending the taxonomy means adding a variant here, never leaving an
/// error unclassified: [`classify`] is total and falls back to
/// [`FailureKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// A referenced checkpoint or transition text is absent on the engine.
    NotFound,
    /// The theory file the obligation lives in is missing.
    NoSuchFile,
    /// Automated search hit its soft time limit.
    TimeoutSoft,
    /// Automated search hit its mid time limit.
    TimeoutMid,
    /// Automated search hit its hard time limit.
    TimeoutHard,
    /// Step execution itself exceeded the engine's internal time limit.
    ExecutionTimeout,
    /// A synthesized step was produced but rejected on application.
    FailedProof,
    /// Anything that matches no known pattern.
    Unknown,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            Self::NotFound => "not-found",
            Self::NoSuchFile => "no-such-file",
            Self::TimeoutSoft => "timeout-soft",
            Self::TimeoutMid => "timeout-mid",
            Self::TimeoutHard => "timeout-hard",
            Self::ExecutionTimeout => "execution-timeout",
            Self::FailedProof => "failed-proof",
            Self::Unknown => "unknown",
        };
        f.write_str(slug)
    }
}

/// Classify an opaque engine failure message into a [`FailureKind`].
///
/// Pure and total: any text (including empty) maps to some category. The
/// patterns are the literal fragments the engine embeds in its error
/// messages; they are mutually exclusive, so match order is irrelevant.
pub fn classify(message: &str) -> FailureKind {
    if message.contains("Transition not found") {
        FailureKind::NotFound
    } else if message.contains("NoSuchFileException") {
        FailureKind::NoSuchFile
    } else if message.contains("Sledgehammer timeout: Timed out") {
        FailureKind::TimeoutSoft
    } else if message.contains("Sledgehammer timeout: Mid timeout exceeded") {
        FailureKind::TimeoutMid
    } else if message.contains("Sledgehammer timeout: Hard timeout exceeded") {
        FailureKind::TimeoutHard
    } else if message.contains("IsabelleMLException: Timeout") {
        FailureKind::ExecutionTimeout
    } else if message.contains("Failed to apply initial proof method") {
        FailureKind::FailedProof
    } else {
        FailureKind::Unknown
    }
}
