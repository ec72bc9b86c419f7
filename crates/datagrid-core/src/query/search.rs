use crate::{
    column::{ColumnRegistry, ColumnSpec, ValueType},
    model::FieldPath,
    query::{DatePart, FieldResolver, PlanError, Predicate},
    value::Value,
};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

///
/// CONSTANTS
///

const TRUTHY: [&str; 2] = ["true", "yes"];
const FALSY: [&str; 2] = ["false", "no"];

// Formats tried, in order, when a term is searched against a date field.
const DATE_FORMATS: &[&[BorrowedFormatItem<'static>]] = &[
    format_description!("[year]-[month padding:none]-[day padding:none]"),
    format_description!("[year]/[month padding:none]/[day padding:none]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
    format_description!("[day padding:none].[month padding:none].[year]"),
    format_description!(
        "[month repr:short case_sensitive:false] [day padding:none], [year]"
    ),
    format_description!("[month repr:long case_sensitive:false] [day padding:none], [year]"),
    format_description!("[day padding:none] [month repr:short case_sensitive:false] [year]"),
];

///
/// SearchTarget
/// What one search term is tested against.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SearchTarget {
    Column(usize),
    Field(FieldPath),
}

///
/// TermSearch
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TermSearch {
    pub term: String,
    pub targets: Vec<SearchTarget>,
}

///
/// Split a search string into terms.
///
/// Whitespace separates terms except inside single or double quotes;
/// surrounding quotes are stripped and duplicates dropped.
///
#[must_use]
pub fn split_terms(raw: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = raw.chars();

    let mut flush = |current: &mut String| {
        let term = current
            .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace())
            .to_string();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
        current.clear();
    };

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            (Some(open), c) if c == open => {
                current.push(c);
                quote = None;
            }
            (None, '"' | '\'') => {
                current.push(c);
                quote = Some(c);
            }
            (None, c) if c.is_whitespace() => flush(&mut current),
            _ => current.push(c),
        }
    }
    flush(&mut current);

    terms
}

///
/// Classify search fields independently into store-resolvable and manual
/// sets. Unlike the ordering split there is no prefix truncation.
///
#[must_use]
pub fn filter_real_fields(
    fields: &[FieldPath],
    resolver: &FieldResolver<'_>,
) -> (Vec<FieldPath>, Vec<FieldPath>) {
    fields
        .iter()
        .cloned()
        .partition(|field| resolver.is_native(field))
}

///
/// Predicates one term contributes for one store field of a given type.
/// An empty result means the term cannot be expressed against the field.
///
#[must_use]
pub fn term_predicates(field: &FieldPath, value_type: ValueType, term: &str) -> Vec<Predicate> {
    match value_type {
        ValueType::Text => vec![Predicate::text_contains_ci(field.clone(), term)],
        ValueType::Date => date_predicates(field, term),
        ValueType::Boolean => {
            let lowered = term.to_lowercase();
            let flag = if TRUTHY.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSY.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            };

            flag.map(|b| Predicate::eq(field.clone(), Value::Bool(b)))
                .into_iter()
                .collect()
        }
        ValueType::Integer => term
            .parse::<i64>()
            .ok()
            .map(|n| Predicate::eq(field.clone(), Value::Int(n)))
            .into_iter()
            .collect(),
        ValueType::Float => term
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| Predicate::eq(field.clone(), Value::Float(n)))
            .into_iter()
            .collect(),
        ValueType::Ignored => Vec::new(),
    }
}

// Exact-date match plus year/month/day component matches for bare integers.
fn date_predicates(field: &FieldPath, term: &str) -> Vec<Predicate> {
    let mut preds = Vec::new();

    if let Some(date) = parse_date(term) {
        preds.push(Predicate::eq(field.clone(), Value::Date(date)));
    }

    if let Ok(n) = term.parse::<i32>() {
        if 0 < n && n < 3000 {
            preds.push(Predicate::date_part(field.clone(), DatePart::Year, n));
        }
        if (1..=12).contains(&n) {
            preds.push(Predicate::date_part(field.clone(), DatePart::Month, n));
        }
        if (1..=31).contains(&n) {
            preds.push(Predicate::date_part(field.clone(), DatePart::Day, n));
        }
    }

    preds
}

/// Parse a date-looking term. Bare integers are never dates.
#[must_use]
pub fn parse_date(term: &str) -> Option<Date> {
    if term.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(term, *format).ok())
}

///
/// SearchPlanner
///
/// Builds the store-side search predicate for one request.
///

pub(crate) struct SearchPlanner<'a> {
    pub columns: &'a [ColumnSpec],
    pub resolver: FieldResolver<'a>,
    pub kinds: &'a ColumnRegistry,
}

impl SearchPlanner<'_> {
    ///
    /// Combine per-term predicates: OR across every target field within a
    /// term, AND across terms. Terms no store field can express do not
    /// constrain the result.
    ///
    pub fn build(&self, searches: &[TermSearch]) -> Result<Option<Predicate>, PlanError> {
        let mut per_term = Vec::with_capacity(searches.len());

        for search in searches {
            let mut preds = Vec::new();
            for target in &search.targets {
                preds.extend(self.target_predicates(target, &search.term)?);
            }
            if let Some(pred) = Predicate::any(preds) {
                per_term.push(pred);
            }
        }

        Ok(Predicate::all(per_term))
    }

    fn target_predicates(
        &self,
        target: &SearchTarget,
        term: &str,
    ) -> Result<Vec<Predicate>, PlanError> {
        match target {
            SearchTarget::Column(index) => {
                let Some(column) = self.columns.get(*index) else {
                    return Ok(Vec::new());
                };

                let mut preds = Vec::new();
                for path in column.paths() {
                    preds.extend(self.field_predicates(path, column.value_type, term)?);
                }
                Ok(preds)
            }
            SearchTarget::Field(path) => self.field_predicates(path, None, term),
        }
    }

    fn field_predicates(
        &self,
        path: &FieldPath,
        declared: Option<ValueType>,
        term: &str,
    ) -> Result<Vec<Predicate>, PlanError> {
        let Some(resolved) = self.resolver.resolve(path) else {
            return Ok(Vec::new());
        };
        let value_type = match declared {
            Some(value_type) => value_type,
            None => self.kinds.classify(resolved.leaf_kind())?,
        };

        Ok(term_predicates(path, value_type, term))
    }
}
