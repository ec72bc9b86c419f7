use crate::{
    column::{ColumnDeclaration, ColumnSpec},
    error::ErrorClass,
    model::{FieldDef, PathError, Schema, SchemaRegistry},
    options::{ConfigError, RequestParams, TableOptions},
    processor::{CallbackTarget, Processor},
    record::Object,
    store::MemoryStore,
    table::{Table, columns_for_schema},
    value::Value,
};
use std::sync::Arc;

fn registry() -> Arc<SchemaRegistry> {
    Arc::new(
        SchemaRegistry::new()
            .with(
                Schema::new("entry", "id")
                    .field(FieldDef::integer("id"))
                    .field(FieldDef::text("headline"))
                    .field(FieldDef::date("pub_date").with_verbose_name("published"))
                    .field(FieldDef::foreign_key("blog", "blog"))
                    .with_ordering(["-pub_date"]),
            )
            .with(
                Schema::new("blog", "id")
                    .field(FieldDef::integer("id"))
                    .field(FieldDef::text("name")),
            ),
    )
}

fn store() -> MemoryStore {
    MemoryStore::new(
        "entry",
        [Object::new(1).with("id", 1).with("headline", "hello")],
    )
}

fn names(table: &Table) -> Vec<&str> {
    table.column_names()
}

///
/// Introspection
///

#[test]
fn introspection_skips_relations_unless_named() {
    let schema = registry().try_get("entry").unwrap();

    let all = columns_for_schema(&schema, &TableOptions::new());
    let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "headline", "pub_date"]);
    assert_eq!(all[2].label, "Published");

    let named = TableOptions::new().with_columns(["blog", "headline"]);
    let picked = columns_for_schema(&schema, &named);
    let names: Vec<_> = picked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["blog", "headline"]);
}

#[test]
fn introspection_applies_option_maps() {
    let schema = registry().try_get("entry").unwrap();
    let options = TableOptions::new()
        .with_exclude(["id"])
        .with_label("headline", "Title")
        .with_processor("headline", "shout")
        .with_unsortable(["pub_date"])
        .with_hidden(["headline"]);
    let columns = columns_for_schema(&schema, &options);

    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].label, "Title");
    assert!(!columns[0].visible);
    assert_eq!(
        columns[0].processor.as_ref().and_then(|p| p.name()),
        Some("shout")
    );
    assert!(!columns[1].sortable);
}

///
/// Builder
///

#[test]
fn declared_columns_replace_and_extend_introspected_ones() {
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .column(ColumnSpec::new("headline").label("Title"))
        .column(ColumnSpec::new("blog").sources(["blog__name"]))
        .build()
        .unwrap();

    assert_eq!(names(&table), vec!["id", "headline", "pub_date", "blog"]);
    assert_eq!(table.columns()[1].label, "Title");
}

#[test]
fn unknown_schema_fails_the_build() {
    let err = Table::builder("entries")
        .schema(registry(), "post")
        .build()
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Config);
    assert_eq!(err.as_path(), Some(&PathError::UnknownSchema("post".into())));
}

#[test]
fn selection_orders_columns_and_reports_unknown_names() {
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .options(TableOptions::new().with_columns(["pub_date", "extra", "id"]))
        .column(ColumnSpec::display("extra"))
        .build()
        .unwrap();
    assert_eq!(names(&table), vec!["pub_date", "extra", "id"]);

    let err = Table::builder("entries")
        .schema(registry(), "entry")
        .options(TableOptions::new().with_columns(["headline", "missing"]))
        .build()
        .unwrap_err();
    assert_eq!(
        err.as_config(),
        Some(&ConfigError::UnknownColumnName(vec!["missing".into()]))
    );
}

#[test]
fn duplicate_declarations_are_rejected() {
    let err = Table::builder("entries")
        .column(ColumnSpec::new("a"))
        .column(ColumnSpec::new("a"))
        .build()
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::Config);
    assert_eq!(
        err.as_config(),
        Some(&ConfigError::DuplicateColumn("a".into()))
    );
}

#[test]
fn malformed_ordering_tokens_are_rejected() {
    for token in ["-", "!x", "!9"] {
        let err = Table::builder("entries")
            .schema(registry(), "entry")
            .options(TableOptions::new().with_ordering([token]))
            .build()
            .unwrap_err();
        assert!(matches!(
            err.as_config(),
            Some(ConfigError::InvalidOrderingToken(t)) if t == token
        ));
    }
}

#[test]
fn bad_search_fields_fail_path_resolution() {
    let err = Table::builder("entries")
        .schema(registry(), "entry")
        .options(TableOptions::new().with_search_fields(["headline__name"]))
        .build()
        .unwrap_err();

    assert!(matches!(err.as_path(), Some(PathError::NotARelation { .. })));
}

#[test]
fn json_declarations_become_columns() {
    let options = TableOptions::from_json_str(r#"{ "columns": [["Blog", "blog__name"]] }"#).unwrap();
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .options(options)
        .declare(ColumnDeclaration::labeled("Both", ["headline", "pub_date"]))
        .unwrap()
        .build()
        .unwrap();

    assert!(names(&table).contains(&"Blog"));
    assert!(names(&table).contains(&"Both"));
}

///
/// Requests
///

#[test]
fn requests_never_annotate_the_template() {
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .build()
        .unwrap();
    let store = store();
    let params = RequestParams::new()
        .with("order[0][column]", "1")
        .with("order[0][dir]", "asc");

    let configured = table.request(&store, params).configure().unwrap();
    assert_eq!(configured.columns[1].sort_priority, Some(0));
    assert!(table.columns().iter().all(|c| c.sort_priority.is_none()));
}

#[test]
fn unknown_named_processor_fails_configuration() {
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .column(ColumnSpec::new("headline").processor("nope"))
        .build()
        .unwrap();
    let store = store();

    let err = table
        .request(&store, RequestParams::new())
        .execute()
        .unwrap_err();
    assert!(matches!(
        err.as_config(),
        Some(ConfigError::UnknownProcessor { name, .. }) if name == "nope"
    ));
}

struct View;

impl CallbackTarget for View {
    fn processor(&self, name: &str) -> Option<Processor> {
        (name == "nope").then(|| Processor::infallible(|_, _, _| Value::from("from view")))
    }
}

#[test]
fn target_supplies_named_processor() {
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .column(ColumnSpec::new("headline").processor("nope"))
        .build()
        .unwrap();
    let store = store();

    let response = table
        .request(&store, RequestParams::new())
        .target(&View)
        .execute()
        .unwrap();
    assert_eq!(response.data[0].cells[1], "from view");
}

#[test]
fn structure_reflects_request_sorting() {
    let table = Table::builder("entries")
        .schema(registry(), "entry")
        .options(TableOptions::new().with_hidden(["id"]))
        .build()
        .unwrap();
    let store = store();

    let structure = table
        .request(&store, RequestParams::new())
        .structure()
        .unwrap();
    assert!(!structure[0].visible);
    let sorting = structure[2].sorting.unwrap();
    assert_eq!((sorting.priority, sorting.index), (0, 2));
}
