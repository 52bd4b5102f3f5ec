use std::fmt;
use thiserror::Error;

/// One problem found while scanning a chart definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line in the whole input; `None` for structural problems.
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn at(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(n) => write!(f, "line {n}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors returned by the chart DSL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DslError {
    #[error("invalid chart format: too few lines")]
    TooFewLines,
    /// Every problem found in one pass, reported together.
    #[error("invalid chart definition:\n{}", bullet_list(.0))]
    Invalid(Vec<Diagnostic>),
}

impl DslError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            DslError::TooFewLines => vec![Diagnostic::general(self.to_string())],
            DslError::Invalid(d) => d.clone(),
        }
    }
}

fn bullet_list(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(|d| format!("• {d}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invalid_lists_every_diagnostic_as_bullet() {
        let err = DslError::Invalid(vec![
            Diagnostic::at(3, "invalid width value 'badwidth'"),
            Diagnostic::general("no valid data points found"),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid chart definition:\n• line 3: invalid width value 'badwidth'\n• no valid data points found"
        );
    }

    #[test]
    fn too_few_lines_message() {
        assert_eq!(
            DslError::TooFewLines.to_string(),
            "invalid chart format: too few lines"
        );
        assert_eq!(DslError::TooFewLines.diagnostics().len(), 1);
    }
}
