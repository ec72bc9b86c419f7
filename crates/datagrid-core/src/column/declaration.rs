use crate::{
    column::{ColumnSpec, Source, pretty_name},
    model::FieldPath,
    options::ConfigError,
    processor::ProcessorRef,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

///
/// ColumnDeclaration
///
/// The three accepted declaration shapes:
///
/// Name      → `"headline"`
/// Labeled   → `("Headline", "headline")` or `("Byline", ["author", "blog__name"])`
/// Processed → `("Headline", "headline", processor)`
///
/// `None` sources are dropped during normalization.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(try_from = "JsonValue", into = "JsonValue")]
pub enum ColumnDeclaration {
    Name(String),
    Labeled {
        label: Option<String>,
        sources: Vec<Option<String>>,
    },
    Processed {
        label: Option<String>,
        sources: Vec<Option<String>>,
        processor: ProcessorRef,
    },
}

impl ColumnDeclaration {
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    #[must_use]
    pub fn labeled<I, S>(label: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Labeled {
            label: Some(label.into()),
            sources: sources.into_iter().map(|s| Some(s.into())).collect(),
        }
    }

    #[must_use]
    pub fn processed<I, S>(
        label: impl Into<String>,
        sources: I,
        processor: impl Into<ProcessorRef>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Processed {
            label: Some(label.into()),
            sources: sources.into_iter().map(|s| Some(s.into())).collect(),
            processor: processor.into(),
        }
    }

    /// Canonicalize into (name, label, sources, processor).
    pub fn normalize(self) -> Result<NormalizedColumn, ConfigError> {
        match self {
            Self::Name(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(ConfigError::InvalidColumnDeclaration(
                        "empty column name".to_string(),
                    ));
                }

                Ok(NormalizedColumn {
                    label: pretty_name(&name),
                    sources: vec![FieldPath::parse(&name)],
                    name,
                    processor: None,
                })
            }
            Self::Labeled { label, sources } => normalize_tuple(label, sources, None),
            Self::Processed {
                label,
                sources,
                processor,
            } => normalize_tuple(label, sources, Some(processor)),
        }
    }

    ///
    /// Parse a JSON declaration: a string, or a 2/3-element array of
    /// `[label, source-or-sources, processor-name]`.
    ///
    pub fn from_json(value: &JsonValue) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColumnDeclaration(value.to_string());

        match value {
            JsonValue::String(name) => Ok(Self::Name(name.clone())),
            JsonValue::Array(items) if (2..=3).contains(&items.len()) => {
                let label = optional_string(&items[0]).ok_or_else(invalid)?;
                let sources = match &items[1] {
                    JsonValue::Array(many) => many
                        .iter()
                        .map(optional_string)
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(invalid)?,
                    single => vec![optional_string(single).ok_or_else(invalid)?],
                };

                match items.get(2) {
                    None | Some(JsonValue::Null) => Ok(Self::Labeled { label, sources }),
                    Some(JsonValue::String(processor)) => Ok(Self::Processed {
                        label,
                        sources,
                        processor: ProcessorRef::named(processor.clone()),
                    }),
                    Some(_) => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<JsonValue> for ColumnDeclaration {
    type Error = ConfigError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl From<ColumnDeclaration> for JsonValue {
    fn from(declaration: ColumnDeclaration) -> Self {
        let tuple = |label: Option<String>, sources: Vec<Option<String>>| {
            let sources = sources.into_iter().map(Self::from).collect::<Vec<_>>();
            vec![Self::from(label), Self::Array(sources)]
        };

        match declaration {
            ColumnDeclaration::Name(name) => Self::String(name),
            ColumnDeclaration::Labeled { label, sources } => Self::Array(tuple(label, sources)),
            ColumnDeclaration::Processed {
                label,
                sources,
                processor,
            } => {
                let mut items = tuple(label, sources);
                items.push(processor.name().map_or(Self::Null, Self::from));
                Self::Array(items)
            }
        }
    }
}

impl From<&str> for ColumnDeclaration {
    fn from(name: &str) -> Self {
        Self::name(name)
    }
}

// Some(Some(s)) for strings, Some(None) for null, None for anything else.
fn optional_string(value: &JsonValue) -> Option<Option<String>> {
    match value {
        JsonValue::String(s) => Some(Some(s.clone())),
        JsonValue::Null => Some(None),
        _ => None,
    }
}

fn normalize_tuple(
    label: Option<String>,
    sources: Vec<Option<String>>,
    processor: Option<ProcessorRef>,
) -> Result<NormalizedColumn, ConfigError> {
    let sources: Vec<FieldPath> = sources
        .into_iter()
        .flatten()
        .map(|raw| FieldPath::parse(&raw))
        .filter(|path| !path.is_empty())
        .collect();

    let label = label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
    let (name, label) = match (label, sources.first()) {
        (Some(label), _) => (label.clone(), label),
        (None, Some(first)) => (first.to_string(), pretty_name(&first.to_string())),
        (None, None) => {
            return Err(ConfigError::InvalidColumnDeclaration(
                "declaration has neither a label nor a source".to_string(),
            ));
        }
    };

    if processor.as_ref().and_then(ProcessorRef::name) == Some("") {
        return Err(ConfigError::InvalidColumnDeclaration(format!(
            "column '{name}' names an empty processor"
        )));
    }

    Ok(NormalizedColumn {
        name,
        label,
        sources,
        processor,
    })
}

///
/// NormalizedColumn
///

#[derive(Clone, Debug)]
pub struct NormalizedColumn {
    pub name: String,
    pub label: String,
    pub sources: Vec<FieldPath>,
    pub processor: Option<ProcessorRef>,
}

impl NormalizedColumn {
    #[must_use]
    pub fn into_column(self) -> ColumnSpec {
        let column = ColumnSpec::display(self.name)
            .with_sources(self.sources.into_iter().map(Source::Path).collect())
            .label(self.label);

        match self.processor {
            Some(processor) => column.processor(processor),
            None => column,
        }
    }
}
