use crate::value::Value;
use std::{collections::BTreeMap, fmt, sync::Arc};

///
/// Entity
///
/// Object-like record with attribute-style lookup.
/// Attributes that do not exist return `None`; extraction treats that the
/// same as a stored null.
///

pub trait Entity: fmt::Debug + Send + Sync {
    fn pk(&self) -> Value;

    fn attribute(&self, name: &str) -> Option<Attribute>;

    /// Human-readable rendering, used when the entity itself is a cell value.
    fn display(&self) -> String {
        self.pk().to_string()
    }

    fn absolute_url(&self) -> Option<String> {
        None
    }
}

///
/// Attribute
///

#[derive(Clone, Debug)]
pub enum Attribute {
    Value(Value),
    Entity(Arc<dyn Entity>),
    Entities(Vec<Arc<dyn Entity>>),
    Method(Method),
}

impl Attribute {
    /// Invoke zero-argument methods until a concrete attribute remains.
    /// Methods flagged `alters_data` are never called.
    #[must_use]
    pub fn settle(self) -> Option<Self> {
        let mut current = self;
        while let Self::Method(method) = current {
            current = method.invoke()?;
        }

        Some(current)
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Arc<dyn Entity>> for Attribute {
    fn from(entity: Arc<dyn Entity>) -> Self {
        Self::Entity(entity)
    }
}

impl From<Method> for Attribute {
    fn from(method: Method) -> Self {
        Self::Method(method)
    }
}

///
/// Method
///
/// Zero-argument callable exposed as an attribute.
/// `alters_data` marks mutating callables that extraction must skip.
///

#[derive(Clone)]
pub struct Method {
    call: Arc<dyn Fn() -> Option<Attribute> + Send + Sync>,
    alters_data: bool,
}

impl Method {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Option<Attribute> + Send + Sync + 'static,
    {
        Self {
            call: Arc::new(f),
            alters_data: false,
        }
    }

    /// Method returning a plain value.
    pub fn value<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::new(move || Some(Attribute::Value(f().into())))
    }

    /// Mark the method as mutating.
    #[must_use]
    pub fn altering(mut self) -> Self {
        self.alters_data = true;
        self
    }

    #[must_use]
    pub const fn alters_data(&self) -> bool {
        self.alters_data
    }

    #[must_use]
    pub fn invoke(&self) -> Option<Attribute> {
        if self.alters_data {
            return None;
        }

        (self.call)()
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("alters_data", &self.alters_data)
            .finish_non_exhaustive()
    }
}

///
/// Object
///
/// Dynamic `Entity` backed by an attribute map.
///

#[derive(Clone, Debug, Default)]
pub struct Object {
    pk: Value,
    display: Option<String>,
    url: Option<String>,
    attributes: BTreeMap<String, Attribute>,
}

impl Object {
    #[must_use]
    pub fn new(pk: impl Into<Value>) -> Self {
        Self {
            pk: pk.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .insert(name.into(), Attribute::Value(value.into()));
        self
    }

    #[must_use]
    pub fn with_related(mut self, name: impl Into<String>, entity: Arc<dyn Entity>) -> Self {
        self.attributes.insert(name.into(), Attribute::Entity(entity));
        self
    }

    #[must_use]
    pub fn with_many(mut self, name: impl Into<String>, entities: Vec<Arc<dyn Entity>>) -> Self {
        self.attributes
            .insert(name.into(), Attribute::Entities(entities));
        self
    }

    #[must_use]
    pub fn with_method(mut self, name: impl Into<String>, method: Method) -> Self {
        self.attributes.insert(name.into(), Attribute::Method(method));
        self
    }

    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Seal into a shareable entity handle.
    #[must_use]
    pub fn shared(self) -> Arc<dyn Entity> {
        Arc::new(self)
    }
}

impl Entity for Object {
    fn pk(&self) -> Value {
        self.pk.clone()
    }

    fn attribute(&self, name: &str) -> Option<Attribute> {
        self.attributes.get(name).cloned()
    }

    fn display(&self) -> String {
        self.display.clone().unwrap_or_else(|| self.pk.to_string())
    }

    fn absolute_url(&self) -> Option<String> {
        self.url.clone()
    }
}
