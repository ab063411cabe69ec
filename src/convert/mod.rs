pub mod forward;
pub mod id;
pub mod reverse;

pub use forward::{ConvertOutcome, ForwardConverter};
pub use id::IdAllocator;
pub use reverse::{ReverseConverter, ReverseOutcome};

/// A soft resolution problem recorded during conversion. Diagnostics never
/// abort the document; the command layer prints them one per line.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub step_number: Option<i64>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            step_number: None,
            message: message.into(),
        }
    }

    pub fn with_step(mut self, number: i64) -> Self {
        self.step_number = Some(number);
        self
    }

    pub fn format(&self) -> String {
        match self.step_number {
            Some(number) => format!("[step {}] {}", number, self.message),
            None => self.message.clone(),
        }
    }
}

/// Invert a condition operator for `else` conversion. Returns `None` for
/// operators outside the known table; callers fall back to `notEqual` and
/// record a diagnostic (the fallback can be wrong for unknown operators).
pub fn invert_operator(operator: &str) -> Option<&'static str> {
    match operator {
        "equal" => Some("notEqual"),
        "notEqual" => Some("equal"),
        "greater" => Some("lessOrEqual"),
        "lessOrEqual" => Some("greater"),
        "less" => Some("greaterOrEqual"),
        "greaterOrEqual" => Some("less"),
        "contains" => Some("notContains"),
        "notContains" => Some("contains"),
        "exists" => Some("notExists"),
        "notExists" => Some("exists"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inversion_table_is_symmetric() {
        for (op, inverted) in [
            ("equal", "notEqual"),
            ("greater", "lessOrEqual"),
            ("less", "greaterOrEqual"),
            ("contains", "notContains"),
            ("exists", "notExists"),
        ] {
            assert_eq!(invert_operator(op), Some(inverted));
            assert_eq!(invert_operator(inverted), Some(op));
        }
    }

    #[test]
    fn test_unknown_operator_has_no_inversion() {
        assert_eq!(invert_operator("matches"), None);
        assert_eq!(invert_operator(""), None);
    }

    #[test]
    fn test_diagnostic_format() {
        let diag = Diagnostic::new("API not found").with_step(3);
        assert_eq!(diag.format(), "[step 3] API not found");

        let diag = Diagnostic::new("no steps");
        assert_eq!(diag.format(), "no steps");
    }
}
