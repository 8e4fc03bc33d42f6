/// Format error message by replacing {} placeholders with values
///
/// # Example
/// ```
/// use opgraph::diagnostics::format_message;
/// let msg = format_message("Expected {}, got {}.", &["GET", "POST"]);
/// assert_eq!(msg, "Expected GET, got POST.");
/// ```
pub fn format_message(template: &str, values: &[&str]) -> String {
    let mut result = template.to_string();
    for value in values {
        result = result.replacen("{}", value, 1);
    }
    result
}
