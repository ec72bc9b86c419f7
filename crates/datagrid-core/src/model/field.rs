///
/// FieldKind
///
/// Storage classification of a schema field.
/// Relation kinds name the schema they point at.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum FieldKind {
    Text,
    Date,
    DateTime,
    Boolean,
    Integer,
    Float,
    Decimal,

    /// Host-defined storage kind; needs an explicit value-type registration
    /// before it can take part in search.
    Custom(String),

    ForeignKey { target: String },
    Reverse { target: String },
    ManyToMany { target: String },
}

impl FieldKind {
    #[must_use]
    pub fn foreign_key(target: impl Into<String>) -> Self {
        Self::ForeignKey {
            target: target.into(),
        }
    }

    #[must_use]
    pub fn reverse(target: impl Into<String>) -> Self {
        Self::Reverse {
            target: target.into(),
        }
    }

    #[must_use]
    pub fn many_to_many(target: impl Into<String>) -> Self {
        Self::ManyToMany {
            target: target.into(),
        }
    }

    /// Target schema for relation kinds.
    #[must_use]
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            Self::ForeignKey { target } | Self::Reverse { target } | Self::ManyToMany { target } => {
                Some(target.as_str())
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_relation(&self) -> bool {
        matches!(
            self,
            Self::ForeignKey { .. } | Self::Reverse { .. } | Self::ManyToMany { .. }
        )
    }

    /// Relations that can yield more than one related record.
    #[must_use]
    pub const fn is_plural_relation(&self) -> bool {
        matches!(self, Self::Reverse { .. } | Self::ManyToMany { .. })
    }
}

///
/// FieldDef
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,

    /// Human label; defaults to the sentence-cased name when absent.
    pub verbose_name: Option<String>,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            verbose_name: None,
        }
    }

    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    #[must_use]
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    #[must_use]
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    #[must_use]
    pub fn foreign_key(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, FieldKind::foreign_key(target))
    }

    #[must_use]
    pub fn reverse(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, FieldKind::reverse(target))
    }

    #[must_use]
    pub fn many_to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, FieldKind::many_to_many(target))
    }

    #[must_use]
    pub fn with_verbose_name(mut self, label: impl Into<String>) -> Self {
        self.verbose_name = Some(label.into());
        self
    }
}
