use crate::{
    cache::CacheKey,
    column::ColumnSpec,
    error::Error,
    executor::{CacheSlot, LoadExecutor},
    options::{Normalizer, RequestConfig, RequestParams, TableOptions},
    processor::{CallbackTarget, Processor, resolve_processor},
    query::FieldResolver,
    response::{RecordSerializer, TableResponse},
    store::RecordSet,
    structure::{ColumnInfo, describe},
    table::Table,
};
use log::debug;

///
/// ConfiguredRequest
///
/// Per-request state: the normalized configuration and this request's own
/// annotated copy of the columns.
///

#[derive(Clone, Debug)]
pub struct ConfiguredRequest {
    pub config: RequestConfig,
    pub columns: Vec<ColumnSpec>,
    pub options: TableOptions,
    processors: Vec<Option<Processor>>,
}

///
/// TableRequest
///

pub struct TableRequest<'t> {
    table: &'t Table,
    store: &'t dyn RecordSet,
    params: RequestParams,
    overrides: TableOptions,
    target: Option<&'t dyn CallbackTarget>,
    user: Option<String>,
}

impl<'t> TableRequest<'t> {
    pub(super) fn new(table: &'t Table, store: &'t dyn RecordSet, params: RequestParams) -> Self {
        Self {
            table,
            store,
            params,
            overrides: TableOptions::new(),
            target: None,
            user: None,
        }
    }

    /// Per-call option layer, above the table's own options.
    #[must_use]
    pub fn overrides(mut self, overrides: TableOptions) -> Self {
        self.overrides = overrides;
        self
    }

    /// Collaborator contributing processors and record hooks.
    #[must_use]
    pub fn target(mut self, target: &'t dyn CallbackTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Requesting user, for cache isolation.
    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    fn resolver(&self) -> FieldResolver<'t> {
        FieldResolver::new(&self.table.registry, self.store.schema())
    }

    /// Normalize the request and resolve every column's processor.
    pub fn configure(&self) -> Result<ConfiguredRequest, Error> {
        let options = self.table.options.merged_with(&self.overrides);
        let fallback = self.table.schema_ordering();
        let mut columns = self.table.columns.clone();

        let config = Normalizer {
            columns: &mut columns,
            resolver: self.resolver(),
            options: &options,
            fallback_ordering: &fallback,
        }
        .normalize(&self.params);

        let processors = columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                resolve_processor(column, index, self.target, &self.table.processors)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ConfiguredRequest {
            config,
            columns,
            options,
            processors,
        })
    }

    /// Column metadata for rendering the table skeleton.
    pub fn structure(&self) -> Result<Vec<ColumnInfo>, Error> {
        Ok(describe(&self.configure()?.columns))
    }

    /// Run the request end to end.
    pub fn execute(&self) -> Result<TableResponse, Error> {
        let configured = self.configure()?;
        let ConfiguredRequest {
            config,
            columns,
            options,
            processors,
        } = &configured;
        let view = self.target.and_then(|target| target.view_name());

        let cache = match &self.table.cache {
            Some(backend) if options.cache().is_enabled() => Some(CacheSlot {
                backend: backend.as_ref(),
                key: self.cache_key(config, view),
            }),
            _ => None,
        };

        let page = LoadExecutor {
            store: self.store,
            columns,
            config,
            resolver: self.resolver(),
            kinds: &self.table.kinds,
            cache,
        }
        .execute()?;

        let data = RecordSerializer {
            columns,
            processors,
            hooks: &self.table.hooks,
            target: self.target,
            view,
        }
        .serialize_page(&page.records);

        debug!(
            "table {}: {} of {} record(s) matched, {} row(s) sent",
            self.table.id,
            page.filtered,
            page.total,
            data.len()
        );

        Ok(TableResponse {
            echo: config.echo.clone(),
            records_total: page.total,
            records_filtered: page.filtered,
            data,
            wire_format: config.wire_format,
        })
    }

    // Everything that shapes the unpaged list; paging is applied after.
    fn cache_key(&self, config: &RequestConfig, view: Option<&str>) -> String {
        let ordering = config
            .ordering
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let column_searches = config
            .column_searches
            .iter()
            .map(|(index, term)| format!("{index}={term}"))
            .collect::<Vec<_>>()
            .join("\u{1f}");
        let search_fields = config
            .search_fields
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let hidden = config
            .hidden_columns
            .iter()
            .cloned()
            .collect::<Vec<_>>()
            .join(",");

        CacheKey::new(&self.table.id)
            .view(view)
            .user(self.user.as_deref())
            .extra("search", config.search.clone())
            .extra("column_searches", column_searches)
            .extra("ordering", ordering)
            .extra("search_fields", search_fields)
            .extra("hidden", hidden)
            .extra("manual_search", config.manual_search.to_string())
            .extra("force_distinct", config.force_distinct.to_string())
            .render()
    }
}
