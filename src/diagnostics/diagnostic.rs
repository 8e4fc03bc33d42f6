use std::{env, fmt};

use super::{ErrorCode, ErrorType, format_message};

/// A compile-time diagnostic.
///
/// Op graphs have no source text, so instead of a span a diagnostic is located
/// by the class link and method that were being compiled when it was raised.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    title: String,
    code: Option<String>,
    error_type: Option<ErrorType>,
    message: Option<String>,
    class: Option<String>,
    method: Option<String>,
    reference: Option<String>,
    hints: Vec<String>,
}

impl Diagnostic {
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: None,
            error_type: None,
            message: None,
            class: None,
            method: None,
            reference: None,
            hints: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_error_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = Some(error_type);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    /// Names the offending reference (e.g. `$total/sub`).
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Records the owning class, keeping one that was already set closer to the failure.
    pub fn in_class(mut self, class: impl Into<String>) -> Self {
        if self.class.is_none() {
            self.class = Some(class.into());
        }
        self
    }

    /// Records the owning method, keeping one that was already set closer to the failure.
    pub fn in_method(mut self, method: impl Into<String>) -> Self {
        if self.method.is_none() {
            self.method = Some(method.into());
        }
        self
    }

    /// Builds an error from an `ErrorCode` template and its arguments.
    pub fn make_error(error_code: &'static ErrorCode, values: &[&str]) -> Self {
        let message = format_message(error_code.message, values);
        let hint = error_code.hint.map(|h| format_message(h, values));

        let mut diag = Diagnostic::error(error_code.title)
            .with_code(error_code.code)
            .with_error_type(error_code.error_type)
            .with_message(message);

        if let Some(hint_text) = hint {
            diag = diag.with_hint(hint_text);
        }

        diag
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn error_type(&self) -> Option<ErrorType> {
        self.error_type
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Render using color unless `NO_COLOR` is set.
    pub fn render(&self) -> String {
        self.render_with(env::var_os("NO_COLOR").is_none())
    }

    pub fn render_with(&self, use_color: bool) -> String {
        let mut out = String::new();
        let yellow = "\u{1b}[33m";
        let reset = "\u{1b}[0m";
        let code = self.code.as_deref().unwrap_or("E000");

        let label = self.error_type.map_or("Error", |error_type| error_type.prefix());

        // Header: -- Compiler error: unresolved reference [E002]
        if use_color {
            out.push_str(yellow);
        }
        out.push_str(&format!(
            "-- {}: {} [{}]\n",
            label,
            self.title.to_lowercase(),
            code
        ));
        if use_color {
            out.push_str(reset);
        }

        if let Some(message) = &self.message {
            out.push('\n');
            out.push_str(message);
            out.push('\n');
        }

        // Location indicator: --> /app/example::bump ($version/gt)
        if let Some(location) = self.location() {
            out.push('\n');
            out.push_str(&format!("  --> {}\n", location));
        }

        if !self.hints.is_empty() {
            out.push_str("\nHint:\n");
            for hint in &self.hints {
                out.push_str(&format!("  {}\n", hint));
            }
        }

        out
    }

    fn location(&self) -> Option<String> {
        let owner = match (&self.class, &self.method) {
            (Some(class), Some(method)) => Some(format!("{}::{}", class, method)),
            (Some(class), None) => Some(class.clone()),
            (None, Some(method)) => Some(method.clone()),
            (None, None) => None,
        };

        match (owner, &self.reference) {
            (Some(owner), Some(reference)) => Some(format!("{} ({})", owner, reference)),
            (Some(owner), None) => Some(owner),
            (None, Some(reference)) => Some(reference.clone()),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.code.as_deref().unwrap_or("E000");
        write!(f, "[{}] {}", code, self.title.to_lowercase())?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(location) = self.location() {
            write!(f, " at {}", location)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

/// Render multiple diagnostics with double newline separation
pub fn render_diagnostics(diagnostics: &[Diagnostic], use_color: bool) -> String {
    diagnostics
        .iter()
        .map(|diag| diag.render_with(use_color))
        .collect::<Vec<_>>()
        .join("\n")
}
