//! Error message categorization for the persona screens.
//!
//! The UI error boundary picks its headline from the category, so the keyword
//! table and its order are fixed. Matching is a case-insensitive substring
//! search and the first category with a hit wins.

use serde::{Deserialize, Serialize};

/// Category of a user-visible failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The 3D scene (Spline) failed to load
    SceneLoad,
    /// Stats or persona calculation failed
    Calculation,
    /// Session data was missing or invalid
    Data,
    /// Anything else
    Generic,
}

/// Keyword table, checked top to bottom
const KEYWORDS: &[(ErrorCategory, &[&str])] = &[
    (ErrorCategory::SceneLoad, &["spline", "3d", "scene"]),
    (ErrorCategory::Calculation, &["calculate", "persona"]),
    (ErrorCategory::Data, &["data", "invalid"]),
];

/// Categorize an error by its message text
pub fn categorize(message: &str) -> ErrorCategory {
    let lower = message.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::Generic)
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::SceneLoad => "scene_load",
            ErrorCategory::Calculation => "calculation",
            ErrorCategory::Data => "data",
            ErrorCategory::Generic => "generic",
        }
    }

    /// Short headline shown by the error boundary
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCategory::SceneLoad => "3D Scene Loading Error",
            ErrorCategory::Calculation => "Calculation Error",
            ErrorCategory::Data => "Data Error",
            ErrorCategory::Generic => "Something went wrong",
        }
    }

    /// Longer explanation shown under the headline
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCategory::SceneLoad => {
                "The 3D visualization could not be loaded. Your persona data is still available."
            }
            ErrorCategory::Calculation => {
                "We had trouble calculating your debate persona. Please try again."
            }
            ErrorCategory::Data => "Some of your session data appears to be invalid or incomplete.",
            ErrorCategory::Generic => "An unexpected error occurred. Please refresh and try again.",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
