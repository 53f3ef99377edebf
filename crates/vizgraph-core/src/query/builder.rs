// Gremlin query builder
//
// Traversals are assembled as a small typed plan and only turned into Gremlin
// text by `render()`, so the shape of a compiled query can be inspected in
// tests without a store.

use std::fmt;

/// Where a traversal starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Caller-supplied traversal text, emitted as-is.
    Expression(String),
    /// `g.V('<id>')`
    Vertex(String),
}

/// Top-level step appended to the source traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Limit(u64),
    Dedup,
    As(String),
    Project(Projection),
}

/// Step inside an anonymous (`__.`) traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnonStep {
    Id,
    Label,
    ValueMap,
    OutE,
    InE,
    OutV,
    InV,
    Select(String),
    Project(Projection),
    Fold,
    Count,
}

/// Anonymous traversal used as a `by()` modulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    steps: Vec<AnonStep>,
}

impl Traversal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: AnonStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn id() -> Self {
        Self::new().then(AnonStep::Id)
    }

    pub fn label() -> Self {
        Self::new().then(AnonStep::Label)
    }

    pub fn value_map() -> Self {
        Self::new().then(AnonStep::ValueMap)
    }

    /// `__.select('<label>').id()`
    pub fn selected_id(label: &str) -> Self {
        Self::new()
            .then(AnonStep::Select(label.to_string()))
            .then(AnonStep::Id)
    }

    pub fn steps(&self) -> &[AnonStep] {
        &self.steps
    }
}

/// `project(k1, k2, ...)` followed by one `by()` per key, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<(String, Traversal)>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, by: Traversal) -> Self {
        self.fields.push((key.to_string(), by));
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&Traversal> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    fn write_to(&self, out: &mut String) {
        out.push_str("project(");
        let keys: Vec<String> = self.fields.iter().map(|(k, _)| quote(k)).collect();
        out.push_str(&keys.join(", "));
        out.push(')');
        for (_, by) in &self.fields {
            out.push_str(".by(");
            by.write_to(out);
            out.push(')');
        }
    }
}

impl Traversal {
    fn write_to(&self, out: &mut String) {
        out.push_str("__");
        for step in &self.steps {
            out.push('.');
            match step {
                AnonStep::Id => out.push_str("id()"),
                AnonStep::Label => out.push_str("label()"),
                AnonStep::ValueMap => out.push_str("valueMap()"),
                AnonStep::OutE => out.push_str("outE()"),
                AnonStep::InE => out.push_str("inE()"),
                AnonStep::OutV => out.push_str("outV()"),
                AnonStep::InV => out.push_str("inV()"),
                AnonStep::Select(label) => {
                    out.push_str("select(");
                    out.push_str(&quote(label));
                    out.push(')');
                }
                AnonStep::Project(projection) => projection.write_to(out),
                AnonStep::Fold => out.push_str("fold()"),
                AnonStep::Count => out.push_str("count()"),
            }
        }
    }
}

/// A full Gremlin query: a source followed by top-level steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GremlinQuery {
    source: Source,
    steps: Vec<Step>,
}

impl GremlinQuery {
    pub fn from_expression(expression: impl Into<String>) -> Self {
        Self {
            source: Source::Expression(expression.into()),
            steps: Vec::new(),
        }
    }

    pub fn vertex(id: impl Into<String>) -> Self {
        Self {
            source: Source::Vertex(id.into()),
            steps: Vec::new(),
        }
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.steps.push(Step::Limit(n));
        self
    }

    pub fn dedup(mut self) -> Self {
        self.steps.push(Step::Dedup);
        self
    }

    /// `as('<label>')`; `as` is a Rust keyword.
    pub fn alias(mut self, label: &str) -> Self {
        self.steps.push(Step::As(label.to_string()));
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.steps.push(Step::Project(projection));
        self
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The final projection, if any.
    pub fn projection(&self) -> Option<&Projection> {
        self.steps.iter().rev().find_map(|s| match s {
            Step::Project(p) => Some(p),
            _ => None,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        match &self.source {
            Source::Expression(expr) => out.push_str(expr.trim_end()),
            Source::Vertex(id) => {
                out.push_str("g.V(");
                out.push_str(&quote(id));
                out.push(')');
            }
        }
        for step in &self.steps {
            out.push('.');
            match step {
                Step::Limit(n) => {
                    out.push_str("limit(");
                    out.push_str(&n.to_string());
                    out.push(')');
                }
                Step::Dedup => out.push_str("dedup()"),
                Step::As(label) => {
                    out.push_str("as(");
                    out.push_str(&quote(label));
                    out.push(')');
                }
                Step::Project(projection) => projection.write_to(&mut out),
            }
        }
        out
    }
}

impl fmt::Display for GremlinQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Single-quoted Gremlin string literal.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_expression_with_steps() {
        let query = GremlinQuery::from_expression("g.V().hasLabel('Person')")
            .dedup()
            .limit(3)
            .alias("node")
            .project(
                Projection::new()
                    .field("id", Traversal::id())
                    .field("label", Traversal::label()),
            );

        assert_eq!(
            query.render(),
            "g.V().hasLabel('Person').dedup().limit(3).as('node').project('id', 'label').by(__.id()).by(__.label())"
        );
        assert_eq!(query.to_string(), query.render());
    }

    #[test]
    fn test_render_nested_projection() {
        let edges = Traversal::new()
            .then(AnonStep::OutE)
            .then(AnonStep::Project(
                Projection::new()
                    .field("from", Traversal::selected_id("node"))
                    .field("to", Traversal::new().then(AnonStep::InV).then(AnonStep::Id)),
            ))
            .then(AnonStep::Fold);
        let query = GremlinQuery::from_expression("g.V()").project(Projection::new().field("edges", edges));

        assert_eq!(
            query.render(),
            "g.V().project('edges').by(__.outE().project('from', 'to').by(__.select('node').id()).by(__.inV().id()).fold())"
        );
    }

    #[test]
    fn test_vertex_source_is_escaped() {
        let query = GremlinQuery::vertex(r"it's\here");
        assert_eq!(query.render(), r"g.V('it\'s\\here')");
    }

    #[test]
    fn test_projection_lookup() {
        let projection = Projection::new()
            .field("id", Traversal::id())
            .field("properties", Traversal::value_map());
        assert_eq!(projection.keys().collect::<Vec<_>>(), vec!["id", "properties"]);
        assert_eq!(projection.get("properties"), Some(&Traversal::value_map()));
        assert!(projection.get("edges").is_none());

        let query = GremlinQuery::from_expression("g.V()").project(projection.clone());
        assert_eq!(query.projection(), Some(&projection));
    }

    #[test]
    fn test_expression_trailing_whitespace_trimmed() {
        let query = GremlinQuery::from_expression("g.V('1')  \n").limit(2);
        assert_eq!(query.render(), "g.V('1').limit(2)");
    }
}
