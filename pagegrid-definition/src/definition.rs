use crate::{DefinitionError, DefinitionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Compiled description of one node type.
///
/// Immutable once built; shared between entities as `Arc<Definition>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    name: String,
    kind: EntityKind,
    contains_children: bool,
    contains_validation: bool,
    properties: Vec<PropertyDefinition>,
}

impl Definition {
    /// Starts building a definition for the node type `name`.
    pub fn builder(name: impl Into<String>) -> DefinitionBuilder {
        DefinitionBuilder::new(name)
    }

    /// Node type identifier, the cache key of the provider.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn is_widget(&self) -> bool {
        self.kind == EntityKind::Widget
    }

    pub fn is_widget_item(&self) -> bool {
        self.kind == EntityKind::WidgetItem
    }

    pub fn is_grid(&self) -> bool {
        self.kind == EntityKind::Grid
    }

    /// Grids always contain children.
    pub fn contains_children(&self) -> bool {
        self.contains_children || self.is_grid()
    }

    pub fn contains_validation(&self) -> bool {
        self.contains_validation
    }

    /// Property definitions in declaration order.
    pub fn properties(&self) -> &[PropertyDefinition] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Definition of a single content property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub scalar_type: ScalarType,
    pub translatable: bool,
}

impl PropertyDefinition {
    /// A translatable property.
    pub fn new(name: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            scalar_type,
            translatable: true,
        }
    }

    /// Shorthand for a translatable string property.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::String)
    }

    /// Shorthand for an integer property.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Int)
    }

    /// Shorthand for a boolean property.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Bool)
    }

    #[must_use]
    pub fn translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }
}

/// Declared scalar type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScalarType {
    Int,
    Double,
    String,
    Array,
    Bool,
    Any,
}

impl ScalarType {
    /// Parses the keyword used in definition files (`INT`, `STRING`, ...).
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "INT" => Some(Self::Int),
            "DOUBLE" => Some(Self::Double),
            "STRING" => Some(Self::String),
            "ARRAY" => Some(Self::Array),
            "BOOL" => Some(Self::Bool),
            "ANY" => Some(Self::Any),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Double => "DOUBLE",
            Self::String => "STRING",
            Self::Array => "ARRAY",
            Self::Bool => "BOOL",
            Self::Any => "ANY",
        }
    }

    /// Checks a JSON value against this type.
    ///
    /// JSON does not separate integral floats from doubles, so `Double`
    /// accepts any number. `Array` accepts lists and maps.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Int => value.is_i64() || value.is_u64(),
            Self::Double => value.is_number(),
            Self::String => value.is_string(),
            Self::Array => value.is_array() || value.is_object(),
            Self::Bool => value.is_boolean(),
            Self::Any => !value.is_null(),
        }
    }
}

/// What role a node type plays in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Widget,
    WidgetItem,
    Grid,
}

impl EntityKind {
    /// Parses a kind keyword. `BLOCK`, `ROW` and `COLUMN` are grid kinds.
    pub fn parse(keyword: &str) -> Option<Self> {
        match keyword {
            "WIDGET" => Some(Self::Widget),
            "WIDGET_ITEM" => Some(Self::WidgetItem),
            "GRID" | "BLOCK" | "ROW" | "COLUMN" => Some(Self::Grid),
            _ => None,
        }
    }

    /// Wire key carrying the concrete type of widgets and widget items.
    pub fn discriminator_key(self) -> Option<&'static str> {
        match self {
            Self::Widget => Some("widgetType"),
            Self::WidgetItem => Some("widgetItemType"),
            Self::Grid => None,
        }
    }
}

/// Builds [`Definition`] instances.
#[derive(Debug, Clone)]
pub struct DefinitionBuilder {
    name: String,
    kind: EntityKind,
    contains_children: bool,
    contains_validation: bool,
    properties: Vec<PropertyDefinition>,
}

impl DefinitionBuilder {
    /// A widget without children, validation or properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntityKind::Widget,
            contains_children: false,
            contains_validation: false,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn with_children(mut self, enabled: bool) -> Self {
        self.contains_children = enabled;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.contains_validation = enabled;
        self
    }

    /// Adds a property. A property with the same name is replaced in place.
    #[must_use]
    pub fn property(mut self, property: PropertyDefinition) -> Self {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    pub fn build(self) -> DefinitionResult<Definition> {
        if self.name.is_empty() {
            return Err(DefinitionError::Compilation(
                "definition name must not be empty".into(),
            ));
        }
        Ok(Definition {
            name: self.name,
            kind: self.kind,
            contains_children: self.contains_children,
            contains_validation: self.contains_validation,
            properties: self.properties,
        })
    }
}
