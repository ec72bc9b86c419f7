use crate::model::FieldDef;

///
/// Schema
///
/// Store-side description of one record type.
/// `ordering` is the type's declared default ordering (`-` prefix for
/// descending), used when neither the client nor the table ask for one.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    pub name: String,
    pub primary_key: String,
    pub fields: Vec<FieldDef>,
    pub ordering: Vec<String>,
}

impl Schema {
    #[must_use]
    pub fn new(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
            fields: Vec::new(),
            ordering: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_ordering<I, S>(mut self, ordering: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ordering = ordering.into_iter().map(Into::into).collect();
        self
    }

    /// Look up a field by name; `pk` aliases the primary key.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        let name = if name == "pk" {
            self.primary_key.as_str()
        } else {
            name
        };

        self.fields.iter().find(|field| field.name == name)
    }

    /// Primary-key field definition, if declared among `fields`.
    #[must_use]
    pub fn primary_key_field(&self) -> Option<&FieldDef> {
        self.get_field(&self.primary_key)
    }
}
