use crate::{
    column::ColumnSpec,
    model::FieldPath,
    options::{MINIMUM_PAGE_LENGTH, RequestParams, TableOptions, WireFormat},
    query::{FieldResolver, OrderDirection, OrderTerm, SearchTarget, TermSearch, split_terms},
};
use log::{trace, warn};
use std::{
    collections::{BTreeMap, BTreeSet},
    ops::Range,
};

///
/// PageLength
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PageLength {
    /// Client sent the `-1` sentinel: no pagination.
    All,
    Limit(usize),
}

///
/// RequestConfig
///
/// Fully normalized configuration of one request. Built fresh for every
/// request; never shared.
///

#[derive(Clone, Debug, PartialEq)]
pub struct RequestConfig {
    pub echo: Option<String>,
    pub search: String,
    pub column_searches: BTreeMap<usize, String>,
    pub start_offset: usize,
    pub page_length: PageLength,
    pub ordering: Vec<OrderTerm>,
    pub unsortable_columns: BTreeSet<String>,
    pub hidden_columns: BTreeSet<String>,
    pub search_fields: Vec<FieldPath>,
    pub manual_search: bool,
    pub force_distinct: bool,
    pub wire_format: WireFormat,
}

impl RequestConfig {
    /// Slice bounds of the current page within `len` filtered records.
    #[must_use]
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.start_offset.min(len);
        let end = match self.page_length {
            PageLength::All => len,
            PageLength::Limit(limit) => start.saturating_add(limit).min(len),
        };

        start..end
    }

    #[must_use]
    pub fn has_search(&self) -> bool {
        !self.search.is_empty() || !self.column_searches.is_empty()
    }

    ///
    /// Group search terms with the targets each must be tested against.
    ///
    /// Per-column terms target their column only. Global terms target every
    /// visible column plus the extra search fields, and replace an identical
    /// per-column term.
    ///
    #[must_use]
    pub fn searches(&self, columns: &[ColumnSpec]) -> Vec<TermSearch> {
        let mut searches: Vec<TermSearch> = Vec::new();

        for (index, raw) in &self.column_searches {
            for term in split_terms(raw) {
                let target = SearchTarget::Column(*index);
                match searches.iter().position(|s| s.term == term) {
                    Some(pos) => {
                        let targets = &mut searches[pos].targets;
                        if !targets.contains(&target) {
                            targets.push(target);
                        }
                    }
                    None => searches.push(TermSearch {
                        term,
                        targets: vec![target],
                    }),
                }
            }
        }

        let global: Vec<SearchTarget> = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.visible && !self.hidden_columns.contains(&column.name))
            .map(|(index, _)| SearchTarget::Column(index))
            .chain(self.search_fields.iter().cloned().map(SearchTarget::Field))
            .collect();

        for term in split_terms(&self.search) {
            match searches.iter().position(|s| s.term == term) {
                Some(pos) => searches[pos].targets.clone_from(&global),
                None => searches.push(TermSearch {
                    term,
                    targets: global.clone(),
                }),
            }
        }

        searches
    }
}

///
/// Normalizer
///
/// Merges the server-side options with untrusted client parameters.
/// Malformed client values fall back to defaults; nothing here can fail.
/// Sort annotations are written onto `columns`, which must be the
/// request's own copy.
///

pub(crate) struct Normalizer<'a> {
    pub columns: &'a mut [ColumnSpec],
    pub resolver: FieldResolver<'a>,
    pub options: &'a TableOptions,

    /// Ordering used when neither the client nor the options give one.
    pub fallback_ordering: &'a [String],
}

impl Normalizer<'_> {
    pub fn normalize(mut self, params: &RequestParams) -> RequestConfig {
        let wire = self.options.wire_format();
        let unsortable: BTreeSet<String> =
            self.options.unsortable_columns().iter().cloned().collect();
        let hidden: BTreeSet<String> = self.options.hidden_columns().iter().cloned().collect();

        for column in self.columns.iter_mut() {
            column.clear_sort_state();
            if unsortable.contains(&column.name) {
                column.sortable = false;
            }
            if hidden.contains(&column.name) {
                column.visible = false;
            }
        }

        let column_searches = (0..self.columns.len())
            .filter_map(|i| {
                let value = params.get(&wire.column_search_param(i))?.trim();
                (!value.is_empty()).then(|| (i, value.to_string()))
            })
            .collect();

        let mut config = RequestConfig {
            echo: params.get(wire.echo_param()).map(ToString::to_string),
            search: params
                .get(wire.search_param())
                .unwrap_or_default()
                .trim()
                .to_string(),
            column_searches,
            start_offset: start_offset(params.get(wire.start_param())),
            page_length: page_length(params.get(wire.length_param()), self.options.page_length()),
            ordering: Vec::new(),
            search_fields: self
                .options
                .search_fields()
                .iter()
                .map(|raw| FieldPath::parse(raw))
                .filter(|path| !path.is_empty())
                .collect(),
            unsortable_columns: unsortable,
            hidden_columns: hidden,
            manual_search: self.options.manual_search(),
            force_distinct: self.options.force_distinct(),
            wire_format: wire,
        };

        config.ordering = self.client_ordering(params, wire, &config.unsortable_columns);
        if config.ordering.is_empty() {
            config.ordering = self.default_ordering();
        }

        config
    }

    // Client sort directives, validated one by one. Invalid entries are dropped.
    fn client_ordering(
        &mut self,
        params: &RequestParams,
        wire: WireFormat,
        unsortable: &BTreeSet<String>,
    ) -> Vec<OrderTerm> {
        let column_count = self.columns.len();
        let directive_count = wire
            .sorting_count_param()
            .and_then(|key| parse_int(params.get(key)))
            .and_then(|n| usize::try_from(n).ok())
            .map_or(column_count, |n| n.min(column_count));

        let mut ordering = Vec::new();
        let mut seen = BTreeSet::new();

        for i in 0..directive_count {
            let Some(index) =
                parse_int(params.get(&wire.sort_column_param(i))).and_then(|n| usize::try_from(n).ok())
            else {
                continue;
            };
            let Some(column) = self.columns.get(index) else {
                trace!("dropping sort directive {i}: column index {index} out of range");
                continue;
            };
            if !column.sortable || unsortable.contains(&column.name) {
                trace!("dropping sort directive {i}: column '{}' is unsortable", column.name);
                continue;
            }
            let Some(direction) = params
                .get(&wire.sort_direction_param(i))
                .and_then(OrderDirection::parse)
            else {
                trace!("dropping sort directive {i}: bad direction");
                continue;
            };
            if !seen.insert(index) {
                continue;
            }

            let priority = seen.len() - 1;
            ordering.extend(self.annotate(index, priority, direction));
        }

        ordering
    }

    // Declared ordering: the options' list, else the schema's own.
    fn default_ordering(&mut self) -> Vec<OrderTerm> {
        let tokens = self
            .options
            .ordering
            .as_deref()
            .unwrap_or(self.fallback_ordering)
            .to_vec();

        let mut ordering = Vec::new();
        let mut priority = 0;

        for token in &tokens {
            let (direction, name) = split_token(token);

            let index = match name.strip_prefix('!') {
                Some(raw) => raw.parse::<usize>().ok().filter(|i| *i < self.columns.len()),
                None => self.columns.iter().position(|c| c.name == name),
            };

            if let Some(index) = index {
                ordering.extend(self.annotate(index, priority, direction));
                priority += 1;
                continue;
            }

            let path = FieldPath::parse(name);
            if !path.is_empty() && self.resolver.is_native(&path) {
                ordering.push(OrderTerm::field(path, direction));
                priority += 1;
            } else {
                warn!("ignoring ordering '{token}': no matching column or field");
            }
        }

        ordering
    }

    // Record sort state on the column and expand it into order terms: one per
    // store-backed source, or a synthetic column key when there is none.
    fn annotate(
        &mut self,
        index: usize,
        priority: usize,
        direction: OrderDirection,
    ) -> Vec<OrderTerm> {
        let resolver = self.resolver;
        let Some(column) = self.columns.get_mut(index) else {
            return Vec::new();
        };

        column.sort_priority = Some(priority);
        column.sort_direction = Some(direction);
        column.index = Some(index);

        let native: Vec<OrderTerm> = column
            .paths()
            .filter(|path| resolver.is_native(path))
            .map(|path| OrderTerm::field(path.clone(), direction))
            .collect();

        if native.is_empty() {
            vec![OrderTerm::column(index, direction)]
        } else {
            native
        }
    }
}

/// Split a declared ordering token into direction and name.
pub(crate) fn split_token(token: &str) -> (OrderDirection, &str) {
    let token = token.trim();
    match token.as_bytes().first() {
        Some(b'-') => (OrderDirection::Desc, &token[1..]),
        Some(b'+') => (OrderDirection::Asc, &token[1..]),
        _ => (OrderDirection::Asc, token),
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse::<i64>().ok()
}

fn start_offset(raw: Option<&str>) -> usize {
    parse_int(raw)
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn page_length(raw: Option<&str>, default: i64) -> PageLength {
    let requested = parse_int(raw).unwrap_or(default);
    if requested == -1 {
        return PageLength::All;
    }

    let clamped = requested.max(MINIMUM_PAGE_LENGTH);
    usize::try_from(clamped).map_or(PageLength::All, PageLength::Limit)
}
