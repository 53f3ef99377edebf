use super::Direction;

pub const SAMPLE_PREFIX: &str = "sample:";
pub const OUTBOUND_MARKER: &str = ".out()";
pub const INBOUND_MARKER: &str = ".in()";

/// How an incoming expression is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// `sample:<name>`: answered from a fixture file, nothing is compiled.
    Fixture(String),
    Traversal { expression: String, direction: Direction },
}

/// Pick the execution path from the prefix and trailing step of `expression`.
///
/// Only the suffix is inspected; the traversal itself is never parsed.
pub fn classify(expression: &str) -> QueryPlan {
    if let Some(name) = expression.strip_prefix(SAMPLE_PREFIX) {
        return QueryPlan::Fixture(name.to_string());
    }

    let tail = expression.trim_end();
    let direction = if tail.ends_with(OUTBOUND_MARKER) {
        Direction::Outbound
    } else if tail.ends_with(INBOUND_MARKER) {
        Direction::Inbound
    } else {
        Direction::SelfOnly
    };

    QueryPlan::Traversal {
        expression: expression.to_string(),
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction_of(expression: &str) -> Direction {
        match classify(expression) {
            QueryPlan::Traversal { direction, .. } => direction,
            QueryPlan::Fixture(name) => panic!("unexpected fixture {}", name),
        }
    }

    #[test]
    fn test_sample_prefix() {
        assert_eq!(classify("sample:demo"), QueryPlan::Fixture("demo".into()));
        assert_eq!(classify("sample:"), QueryPlan::Fixture(String::new()));
        // Prefix must be at the very start
        assert_eq!(direction_of(" sample:demo"), Direction::SelfOnly);
    }

    #[test]
    fn test_direction_from_suffix() {
        assert_eq!(direction_of("g.V('123')"), Direction::SelfOnly);
        assert_eq!(direction_of("g.V('123').out()"), Direction::Outbound);
        assert_eq!(direction_of("g.V('123').in()"), Direction::Inbound);
        assert_eq!(direction_of("g.V('123').out() \n"), Direction::Outbound);
    }

    #[test]
    fn test_only_trailing_step_counts() {
        assert_eq!(direction_of("g.V('123').out().has('age', 30)"), Direction::SelfOnly);
        assert_eq!(direction_of("g.V('123').in().out()"), Direction::Outbound);
        assert_eq!(direction_of("g.V('123').out('knows')"), Direction::SelfOnly);
        assert_eq!(direction_of(""), Direction::SelfOnly);
    }

    #[test]
    fn test_expression_kept_verbatim() {
        match classify("g.V('1').in() ") {
            QueryPlan::Traversal { expression, direction } => {
                assert_eq!(expression, "g.V('1').in() ");
                assert_eq!(direction, Direction::Inbound);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }
}
