//! Section boundaries
//!
//! Banner records marking the start or end of a logical phase.

use std::fmt;

/// Width of the `=` separator around a section name
pub const SEPARATOR_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Start,
    End,
}

impl BoundaryKind {
    pub fn from_is_start(is_start: bool) -> Self {
        if is_start {
            BoundaryKind::Start
        } else {
            BoundaryKind::End
        }
    }
}

impl fmt::Display for BoundaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryKind::Start => write!(f, "START"),
            BoundaryKind::End => write!(f, "END"),
        }
    }
}

/// Start or end banner for a named section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBoundary {
    name: String,
    kind: BoundaryKind,
}

impl SectionBoundary {
    pub fn new(name: impl Into<String>, kind: BoundaryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> BoundaryKind {
        self.kind
    }

    /// Banner message. Begins with a newline so the separator starts its own line.
    pub fn message(&self) -> String {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        format!("\n{separator}\n{}: {}\n{separator}", self.kind, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, BoundaryKind::Start, "START")]
    #[case(false, BoundaryKind::End, "END")]
    fn test_kind_from_flag(#[case] is_start: bool, #[case] kind: BoundaryKind, #[case] label: &str) {
        assert_eq!(BoundaryKind::from_is_start(is_start), kind);
        assert_eq!(kind.to_string(), label);
    }

    #[test]
    fn test_start_banner() {
        let message = SectionBoundary::new("Download filings", BoundaryKind::Start).message();
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "=".repeat(50));
        assert_eq!(lines[2], "START: Download filings");
        assert_eq!(lines[3], "=".repeat(50));
    }

    #[test]
    fn test_end_banner() {
        let boundary = SectionBoundary::new("Render", BoundaryKind::from_is_start(false));
        assert_eq!(boundary.name(), "Render");
        assert_eq!(boundary.kind(), BoundaryKind::End);
        assert!(boundary.message().contains("\nEND: Render\n"));
        assert!(!boundary.message().contains("START"));
    }
}
