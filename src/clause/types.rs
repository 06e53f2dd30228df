use serde::Serialize;
use serde_json::Value;

/// Comparison operator placed between a column and its placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
}

impl CompareOp {
    /// SQL text for the operator. Keyword operators carry their own spacing
    /// so fragments read `"name" ILIKE $1` next to `"salary">=$2`.
    pub fn to_sql(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Like => " LIKE ",
            CompareOp::ILike => " ILIKE ",
        }
    }
}

/// How placeholders are spelled for the query executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `$1, $2, ...` (PostgreSQL)
    #[default]
    Dollar,
    /// `?, ?, ...` bound strictly by position
    Question,
}

impl PlaceholderStyle {
    pub fn placeholder(&self, position: usize) -> String {
        match self {
            PlaceholderStyle::Dollar => format!("${}", position),
            PlaceholderStyle::Question => "?".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Comma,
    And,
}

impl Separator {
    fn to_sql(&self) -> &'static str {
        match self {
            Separator::Comma => ", ",
            Separator::And => " AND ",
        }
    }
}

/// Translation table from external (API) field names to storage columns.
/// Names without an entry pass through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMap<'a>(&'a [(&'a str, &'a str)]);

impl<'a> FieldMap<'a> {
    pub const EMPTY: FieldMap<'static> = FieldMap(&[]);

    pub const fn new(pairs: &'a [(&'a str, &'a str)]) -> Self {
        Self(pairs)
    }

    pub fn resolve<'k>(&self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.0
            .iter()
            .find(|(external, _)| *external == key)
            .map(|(_, column)| *column)
            .unwrap_or(key)
    }
}

/// One `column operator value` triple, before placeholder text exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseTerm {
    pub column: String,
    pub operator: CompareOp,
    pub value: Value,
}

/// A rendered `SET` or `WHERE` fragment with its positional parameters.
///
/// Placeholder `k` in `clause_text` binds `values[k - 1]`; the text is
/// rendered once from the final term list so the two cannot drift apart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseResult {
    pub clause_text: String,
    pub values: Vec<Value>,
    #[serde(skip)]
    terms: Vec<ClauseTerm>,
    #[serde(skip)]
    separator: Separator,
}

impl ClauseResult {
    pub(crate) fn from_terms(terms: Vec<ClauseTerm>, separator: Separator) -> Self {
        let clause_text = render_terms(&terms, separator, PlaceholderStyle::Dollar);
        let values = terms.iter().map(|t| t.value.clone()).collect();
        Self { clause_text, values, terms, separator }
    }

    pub(crate) fn empty(separator: Separator) -> Self {
        Self::from_terms(vec![], separator)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[ClauseTerm] {
        &self.terms
    }

    /// Placeholder for the first parameter a caller appends after this clause,
    /// e.g. the key in `UPDATE ... SET <clause> WHERE id = $N+1`.
    pub fn next_placeholder(&self) -> String {
        PlaceholderStyle::Dollar.placeholder(self.values.len() + 1)
    }

    /// `" WHERE <clause>"`, or an empty string when there is nothing to filter on.
    pub fn where_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clause_text)
        }
    }

    /// Re-render the clause for another binding convention. Parameter order is unchanged.
    pub fn render(&self, style: PlaceholderStyle) -> String {
        render_terms(&self.terms, self.separator, style)
    }

    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.clause_text, self.values)
    }
}

/// Double-quote an identifier, doubling any embedded quote.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn render_terms(terms: &[ClauseTerm], separator: Separator, style: PlaceholderStyle) -> String {
    terms
        .iter()
        .enumerate()
        .map(|(idx, term)| {
            format!(
                "{}{}{}",
                quote_ident(&term.column),
                term.operator.to_sql(),
                style.placeholder(idx + 1)
            )
        })
        .collect::<Vec<_>>()
        .join(separator.to_sql())
}
