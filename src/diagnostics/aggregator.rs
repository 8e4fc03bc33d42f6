use std::collections::HashSet;

use super::Diagnostic;

/// Default max error limit to avoid overwhelming output.
pub const DEFAULT_MAX_ERRORS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagnosticCounts {
    pub errors: usize,
}

impl DiagnosticCounts {
    pub fn summary_line(&self) -> Option<String> {
        format_summary(self)
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticsReport {
    pub counts: DiagnosticCounts,
    pub rendered: String,
}

/// Deduplicates, orders and renders the diagnostics of one or more class compilations.
///
/// Diagnostics are grouped by owning class, then ordered by method and message, so a report is stable no matter in which order classes were compiled.
pub struct DiagnosticsAggregator<'a> {
    diagnostics: &'a [Diagnostic],
    max_errors: Option<usize>,
    use_color: bool,
}

impl<'a> DiagnosticsAggregator<'a> {
    pub fn new(diagnostics: &'a [Diagnostic]) -> Self {
        Self {
            diagnostics,
            max_errors: None,
            use_color: false,
        }
    }

    pub fn with_max_errors(mut self, max_errors: Option<usize>) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn report(&self) -> DiagnosticsReport {
        if self.diagnostics.is_empty() {
            return DiagnosticsReport {
                counts: DiagnosticCounts::default(),
                rendered: String::new(),
            };
        }

        let mut seen: HashSet<&Diagnostic> = HashSet::new();
        let mut unique: Vec<&Diagnostic> = Vec::new();
        for diag in self.diagnostics {
            if seen.insert(diag) {
                unique.push(diag);
            }
        }

        let counts = DiagnosticCounts {
            errors: unique.len(),
        };

        unique.sort_by(|a, b| {
            a.class()
                .unwrap_or("")
                .cmp(b.class().unwrap_or(""))
                .then_with(|| a.method().unwrap_or("").cmp(b.method().unwrap_or("")))
                .then_with(|| a.message().unwrap_or("").cmp(b.message().unwrap_or("")))
                .then_with(|| a.title().cmp(b.title()))
        });

        let mut rendered = String::new();
        if let Some(summary) = format_summary(&counts) {
            rendered.push_str(&summary);
            rendered.push_str("\n\n");
        }

        let max_errors = self.max_errors.unwrap_or(usize::MAX);
        let mut errors_shown = 0usize;
        let mut groups: Vec<String> = Vec::new();
        let mut current_class: Option<&str> = None;
        let mut current_group = String::new();

        for diag in unique {
            if errors_shown >= max_errors {
                break;
            }
            errors_shown += 1;

            let class = diag.class().unwrap_or("<context>");
            if current_class != Some(class) {
                if !current_group.is_empty() {
                    groups.push(std::mem::take(&mut current_group));
                }
                current_class = Some(class);
                current_group.push_str(&format!("--> {}\n", class));
            }

            current_group.push('\n');
            current_group.push_str(&diag.render_with(self.use_color));
        }

        if !current_group.is_empty() {
            groups.push(current_group);
        }

        rendered.push_str(&groups.join("\n"));

        let errors_truncated = counts.errors.saturating_sub(errors_shown);
        if errors_truncated > 0 {
            if !rendered.ends_with('\n') {
                rendered.push('\n');
            }
            rendered.push_str(&format!(
                "... and {} more errors not shown.\n",
                errors_truncated
            ));
        }

        DiagnosticsReport { counts, rendered }
    }

    pub fn render(&self) -> String {
        self.report().rendered
    }
}

fn format_summary(counts: &DiagnosticCounts) -> Option<String> {
    if counts.errors <= 1 {
        return None;
    }

    Some(format!("Found {} errors.", counts.errors))
}

/// Renders an uncolored report of `diagnostics`, capped at [`DEFAULT_MAX_ERRORS`].
pub fn render_report(diagnostics: &[Diagnostic]) -> String {
    DiagnosticsAggregator::new(diagnostics)
        .with_max_errors(Some(DEFAULT_MAX_ERRORS))
        .render()
}
