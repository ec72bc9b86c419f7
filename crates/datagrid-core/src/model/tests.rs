use crate::model::{FieldDef, FieldKind, FieldPath, PathError, Schema, SchemaRegistry};

fn registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(
            Schema::new("blog", "id")
                .field(FieldDef::integer("id"))
                .field(FieldDef::text("name"))
                .field(FieldDef::reverse("entries", "entry")),
        )
        .with(
            Schema::new("entry", "id")
                .field(FieldDef::integer("id"))
                .field(FieldDef::text("headline"))
                .field(FieldDef::date("pub_date"))
                .field(FieldDef::foreign_key("blog", "blog"))
                .field(FieldDef::many_to_many("authors", "author")),
        )
        .with(
            Schema::new("author", "id")
                .field(FieldDef::integer("id"))
                .field(FieldDef::text("name")),
        )
}

#[test]
fn path_parsing_accepts_both_separators() {
    assert_eq!(FieldPath::parse("blog__name"), FieldPath::parse("blog.name"));
    assert_eq!(FieldPath::parse("blog.name").to_string(), "blog__name");
    assert_eq!(FieldPath::parse("pub_date").len(), 1);
    assert!(FieldPath::parse("").is_empty());
}

#[test]
fn resolves_local_field() {
    let resolved = registry()
        .resolve("entry", &FieldPath::parse("headline"))
        .unwrap();
    assert_eq!(resolved.leaf.kind, FieldKind::Text);
    assert!(resolved.hops.is_empty());
}

#[test]
fn resolves_through_forward_relation() {
    let resolved = registry()
        .resolve("entry", &FieldPath::parse("blog.name"))
        .unwrap();
    assert_eq!(resolved.leaf.name, "name");
    assert!(!resolved.contains_plural_relation());
}

#[test]
fn plural_relations_are_detected() {
    let reg = registry();
    let m2m = reg
        .resolve("entry", &FieldPath::parse("authors__name"))
        .unwrap();
    assert!(m2m.contains_plural_relation());

    let reverse = reg
        .resolve("blog", &FieldPath::parse("entries__headline"))
        .unwrap();
    assert!(reverse.contains_plural_relation());
}

#[test]
fn pk_segment_aliases_primary_key() {
    let resolved = registry()
        .resolve("entry", &FieldPath::parse("blog__pk"))
        .unwrap();
    assert_eq!(resolved.leaf.name, "id");
}

#[test]
fn missing_segment_is_path_not_found() {
    let err = registry()
        .resolve("entry", &FieldPath::parse("blog__missing"))
        .unwrap_err();
    assert!(matches!(err, PathError::PathNotFound { ref segment, .. } if segment == "missing"));
}

#[test]
fn scalar_in_the_middle_is_not_a_relation() {
    let err = registry()
        .resolve("entry", &FieldPath::parse("headline__length"))
        .unwrap_err();
    assert!(matches!(err, PathError::NotARelation { ref segment, .. } if segment == "headline"));
}

#[test]
fn empty_and_unknown() {
    let reg = registry();
    assert!(matches!(
        reg.resolve("entry", &FieldPath::default()),
        Err(PathError::EmptyPath { .. })
    ));
    assert_eq!(
        reg.resolve("nope", &FieldPath::parse("x")),
        Err(PathError::UnknownSchema("nope".to_string()))
    );
}

#[test]
fn reregistering_clears_memoized_paths() {
    let mut reg = registry();
    assert!(reg.resolve("author", &FieldPath::parse("name")).is_ok());

    reg.register(Schema::new("author", "id").field(FieldDef::integer("id")));
    assert!(reg.resolve("author", &FieldPath::parse("name")).is_err());
}
