//! The persisted layout document and its component/path records.

use crate::elements::Data;
use crate::{generate_id, ComponentKind, InterchangeError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// File name stem used when the layout has no name.
pub const DEFAULT_FILE_NAME: &str = "HashFrog_Tracker";

/// Suffix of saved layout files.
pub const LAYOUT_EXTENSION: &str = "layout.json";

/// Top-level fields a file must carry to be accepted as a layout.
const REQUIRED_FIELDS: [&str; 2] = ["layoutConfig", "components"];

/// One component or path record.
///
/// Records are open: the `type` field selects a default table, and any
/// field the editor does not know about is carried along untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Entry(pub Map<String, Value>);

impl Entry {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps a JSON object. Non-object values produce an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The raw `type` string, empty when missing.
    pub fn type_name(&self) -> &str {
        self.0.get("type").and_then(Value::as_str).unwrap_or("")
    }

    pub fn kind(&self) -> ComponentKind {
        ComponentKind::from_type(self.type_name())
    }

    pub fn element_id(&self) -> Option<&str> {
        self.0.get("elementId").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Entry {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A complete tracker layout as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LayoutDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "layoutConfig")]
    pub layout_config: Map<String, Value>,

    pub components: Vec<Entry>,

    /// Older files predate paths; they load with none.
    #[serde(default)]
    pub paths: Vec<Entry>,

    /// Custom element definitions, kept as raw records so they save back
    /// exactly as loaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<Vec<Entry>>,

    /// Top-level fields this version does not know about.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LayoutDocument {
    /// The empty starting layout, carrying a fresh `id`.
    pub fn base() -> Self {
        let mut doc = Data::get_text("base.layout.json")
            .and_then(|text| Self::from_json(&text).ok())
            .unwrap_or_else(|| {
                log::error!("embedded base layout is missing or malformed");
                Self::default()
            });
        doc.id = Some(generate_id());
        doc
    }

    /// Parse a document without normalizing it.
    ///
    /// Fails when the text is not JSON, is not an object, or lacks
    /// `layoutConfig` or `components`.
    pub fn from_json(input: &str) -> Result<Self, InterchangeError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| InterchangeError::Parse(format!("{}", e)))?;

        let object = value.as_object().ok_or_else(|| {
            InterchangeError::InvalidStructure("Layout must be a JSON object".into())
        })?;

        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(InterchangeError::MissingField(field.to_string()));
            }
        }

        serde_json::from_value(value).map_err(|e| InterchangeError::InvalidStructure(format!("{}", e)))
    }

    /// Serialize the document as compact JSON, exactly as held in memory.
    pub fn to_json(&self) -> Result<String, InterchangeError> {
        serde_json::to_string(self).map_err(|e| InterchangeError::InvalidStructure(format!("{}", e)))
    }

    pub fn to_json_pretty(&self) -> Result<String, InterchangeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InterchangeError::InvalidStructure(format!("{}", e)))
    }

    /// Read and parse a layout file. Does not normalize.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InterchangeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| InterchangeError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Write the document to `path` verbatim.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), InterchangeError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| InterchangeError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Write the document into `dir` under [`LayoutDocument::export_file_name`].
    pub fn save_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf, InterchangeError> {
        self.save_to_dir_or(dir, DEFAULT_FILE_NAME)
    }

    /// Like [`LayoutDocument::save_to_dir`], naming unnamed layouts `fallback`.
    pub fn save_to_dir_or(
        &self,
        dir: impl AsRef<Path>,
        fallback: &str,
    ) -> Result<PathBuf, InterchangeError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            InterchangeError::Io(format!("Failed to create directory {}: {}", dir.display(), e))
        })?;

        let path = dir.join(self.export_file_name_or(fallback));
        self.save(&path)?;
        Ok(path)
    }

    pub fn name(&self) -> Option<&str> {
        self.layout_config
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// `<name with spaces replaced by underscores>.layout.json`
    pub fn export_file_name(&self) -> String {
        self.export_file_name_or(DEFAULT_FILE_NAME)
    }

    pub fn export_file_name_or(&self, fallback: &str) -> String {
        let stem = self
            .name()
            .map(|name| name.replace(' ', "_"))
            .unwrap_or_else(|| fallback.to_string());
        format!("{}.{}", stem, LAYOUT_EXTENSION)
    }

    /// Custom element records, empty when the document has none.
    pub fn custom_elements(&self) -> &[Entry] {
        self.elements.as_deref().unwrap_or(&[])
    }

    pub fn component(&self, id: &str) -> Option<&Entry> {
        self.components.iter().find(|c| c.id() == Some(id))
    }

    pub fn path(&self, id: &str) -> Option<&Entry> {
        self.paths.iter().find(|p| p.id() == Some(id))
    }
}
