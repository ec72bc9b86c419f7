#![allow(dead_code)]

use datagrid_core::prelude::*;
use std::sync::Arc;
use time::macros::date;

///
/// Blog fixture
///
/// entry  → id, headline, pub_date, featured, blog (fk), authors (m2m)
/// blog   → id, name
/// author → id, name
///

pub fn registry() -> Arc<SchemaRegistry> {
    Arc::new(
        SchemaRegistry::new()
            .with(
                Schema::new("entry", "id")
                    .field(FieldDef::integer("id"))
                    .field(FieldDef::text("headline"))
                    .field(FieldDef::date("pub_date").with_verbose_name("published"))
                    .field(FieldDef::boolean("featured"))
                    .field(FieldDef::foreign_key("blog", "blog"))
                    .field(FieldDef::many_to_many("authors", "author"))
                    .with_ordering(["-pub_date"]),
            )
            .with(
                Schema::new("blog", "id")
                    .field(FieldDef::integer("id"))
                    .field(FieldDef::text("name")),
            )
            .with(
                Schema::new("author", "id")
                    .field(FieldDef::integer("id"))
                    .field(FieldDef::text("name")),
            )
            .with(
                Schema::new("item", "id")
                    .field(FieldDef::integer("id"))
                    .field(FieldDef::text("name")),
            ),
    )
}

pub fn entries() -> MemoryStore {
    let rust = Object::new(1)
        .with("name", "Rust Notes")
        .with_display("Rust Notes")
        .with_url("/blogs/1/")
        .shared();
    let weekly = Object::new(2)
        .with("name", "Async Weekly")
        .with_display("Async Weekly")
        .shared();
    let ferris = Object::new(10).with("name", "Ferris").shared();
    let corro = Object::new(11).with("name", "Corro").shared();

    MemoryStore::new(
        "entry",
        [
            Object::new(1)
                .with("id", 1)
                .with("headline", "Borrowing basics")
                .with("pub_date", date!(2019 - 05 - 01))
                .with("featured", true)
                .with_related("blog", Arc::clone(&rust))
                .with_many("authors", vec![Arc::clone(&ferris)]),
            Object::new(2)
                .with("id", 2)
                .with("headline", "Lifetimes explained")
                .with("pub_date", date!(2020 - 02 - 14))
                .with("featured", false)
                .with_related("blog", rust)
                .with_many("authors", vec![ferris, Arc::clone(&corro)]),
            Object::new(3)
                .with("id", 3)
                .with("headline", "Pinning futures")
                .with("pub_date", date!(2020 - 11 - 30))
                .with("featured", true)
                .with_related("blog", Arc::clone(&weekly))
                .with_many("authors", vec![corro]),
            Object::new(4)
                .with("id", 4)
                .with("headline", "Executors compared")
                .with("pub_date", date!(2021 - 07 - 04))
                .with("featured", false)
                .with_related("blog", weekly)
                .with_many("authors", Vec::new()),
        ],
    )
}

pub fn entry_table() -> TableBuilder {
    Table::builder("blog.entries").schema(registry(), "entry")
}

/// Three items named so that only two contain both "test" and "1".
pub fn items() -> MemoryStore {
    MemoryStore::new(
        "item",
        [
            Object::new(1).with("id", 1).with("name", "test name 1"),
            Object::new(2).with("id", 2).with("name", "test name 2"),
            Object::new(3).with("id", 3).with("name", "test name 12"),
        ],
    )
}

pub fn item_table() -> Table {
    Table::builder("items")
        .schema(registry(), "item")
        .options(TableOptions::new().with_columns(["name"]))
        .build()
        .unwrap()
}

pub fn search(term: &str) -> RequestParams {
    RequestParams::new().with("search[value]", term)
}

/// Row ids of the response, in page order.
pub fn ids(response: &TableResponse) -> Vec<Value> {
    response.data.iter().map(|row| row.row_id.clone()).collect()
}

pub fn int_ids(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}

/// One column of the response, as sent.
pub fn column(response: &TableResponse, index: usize) -> Vec<String> {
    response
        .data
        .iter()
        .map(|row| row.cells[index].clone())
        .collect()
}
