//! Component and path types, and the default record each one expands to.
//!
//! The default tables are a versioned contract with every layout file ever
//! saved: fields may be added, never removed or changed.

use crate::Entry;
use serde_json::{json, Value};
use strum_macros::{EnumString, IntoStaticStr};

/// The `type` discriminant of a component or path record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ComponentKind {
    Element,
    Table,
    SometimesHint,
    LocationHint,
    HintTable,
    Label,
    /// A canvas rooting its own node tree. Only reachable through a type change.
    Path,
    /// Anything else, including types from newer schema versions. Kept verbatim.
    #[strum(default)]
    Unknown(String),
}

impl ComponentKind {
    /// Types the normalizer fills in on load.
    pub const NORMALIZED: [ComponentKind; 6] = [
        Self::Element,
        Self::Table,
        Self::SometimesHint,
        Self::LocationHint,
        Self::HintTable,
        Self::Label,
    ];

    pub fn from_type(type_name: &str) -> Self {
        // EnumString with a default variant never fails
        type_name
            .parse()
            .unwrap_or_else(|_| Self::Unknown(type_name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Unknown(name) => name,
            known => <&'static str>::from(known),
        }
    }

    /// Default fields applied on load, without `id` and `type`.
    ///
    /// `None` means records of this type pass through normalization untouched.
    pub fn normalized_defaults(&self) -> Option<Entry> {
        let fields = match self {
            Self::Element => json!({
                "elementId": "0c44ac338d7249b39271d0b25425b7d9",
                "position": [0, 0],
                "size": [25, 25],
                "receiver": false,
                "dragCurrent": false,
                "swappable": false,
                "selectedStartingIndex": 0,
                "countConfig": [0, 5],
                "labelStartingIndex": 0,
            }),
            Self::Table => json!({
                "position": [0, 0],
                "columns": 3,
                "padding": "2px",
                "elements": [],
                "elementsSize": [25, 25],
                "swappable": false,
            }),
            Self::SometimesHint => json!({
                "elementId": "4c1b24c3e3954038b14f4daa3656e0b5",
                "position": [0, 0],
                "labels": "sometimes",
                "width": 150,
                "color": "#ffffff",
                "backgroundColor": "#333333",
                "showIcon": true,
                "inverted": false,
                "swappable": false,
            }),
            Self::LocationHint => json!({
                "elementId": "4c1b24c3e3954038b14f4daa3656e0b5",
                "position": [0, 0],
                "labels": "locations",
                "width": 250,
                "color": "#ffffff",
                "backgroundColor": "#4a8ab6",
                "showBoss": true,
                "showItems": true,
                "swappable": false,
            }),
            // Hint tables and labels have no position default: a record without
            // one stays without one.
            Self::HintTable => json!({
                "elementId": "4c1b24c3e3954038b14f4daa3656e0b5",
                "hintType": "sometimes",
                "hintNumber": 1,
                "columns": 1,
                "width": 200,
                "padding": "2px",
                "labels": "sometimes",
                "color": "#ffffff",
                "backgroundColor": "#333333",
                "showIcon": true,
                "inverted": false,
                "showBoss": true,
                "showItems": true,
                "swappable": false,
            }),
            Self::Label => json!({
                "color": "#ffffff",
                "backgroundColor": "#000000",
                "padding": "2px",
                "text": "",
                "fontSize": "12px",
            }),
            Self::Path | Self::Unknown(_) => return None,
        };
        Some(Entry::from_value(fields))
    }

    /// Fields a record gets when the user switches it to this type, without
    /// `id`, `type` and `position`.
    ///
    /// `None` means the type change is ignored.
    pub fn template(&self) -> Option<Entry> {
        let fields = match self {
            Self::Element => json!({
                "elementId": "a081121b16f84366bf16e16ca90cd23f",
                "size": [25, 25],
                "receiver": false,
                "dragCurrent": false,
                "selectedStartingIndex": 0,
                "countConfig": [0, 5],
                "labelStartingIndex": 0,
            }),
            Self::Table => json!({
                "columns": 3,
                "padding": "2px",
                "elements": [],
                "elementsSize": [25, 25],
            }),
            Self::SometimesHint => json!({
                "elementId": "4c1b24c3e3954038b14f4daa3656e0b5",
                "labels": "sometimes",
                "width": 150,
                "color": "#ffffff",
                "backgroundColor": "#333333",
                "showIcon": true,
                "inverted": false,
            }),
            Self::LocationHint => json!({
                "elementId": "4c1b24c3e3954038b14f4daa3656e0b5",
                "labels": "locations",
                "width": 250,
                "color": "#ffffff",
                "backgroundColor": "#4a8ab6",
                "showBoss": true,
                "showItems": true,
            }),
            Self::HintTable => json!({
                "elementId": "4c1b24c3e3954038b14f4daa3656e0b5",
                "hintType": "sometimes",
                "hintNumber": 1,
                "columns": 1,
                "width": 200,
                "padding": "2px",
                "labels": "sometimes",
                "color": "#ffffff",
                "backgroundColor": "#333333",
                "showIcon": true,
                "inverted": false,
                "showBoss": true,
                "showItems": true,
            }),
            Self::Label => json!({
                "color": "#ffffff",
                "backgroundColor": "#000000",
                "padding": "2px",
                "text": "Label Text",
                "fontSize": "12px",
            }),
            Self::Path => json!({
                "backgroundColor": "#000000",
                "elementsSize": [25, 25],
            }),
            Self::Unknown(_) => return None,
        };
        Some(Entry::from_value(fields))
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ComponentKind> for Value {
    fn from(kind: &ComponentKind) -> Self {
        Value::String(kind.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_round_trip() {
        for name in [
            "element",
            "table",
            "sometimeshint",
            "locationhint",
            "hinttable",
            "label",
            "path",
        ] {
            let kind = ComponentKind::from_type(name);
            assert!(!matches!(kind, ComponentKind::Unknown(_)), "{name}");
            assert_eq!(kind.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_types_are_preserved() {
        assert_eq!(
            ComponentKind::from_type("timer"),
            ComponentKind::Unknown("timer".into())
        );
        assert_eq!(ComponentKind::from_type("Label").as_str(), "Label");
        assert_eq!(ComponentKind::from_type("").as_str(), "");
    }

    #[test]
    fn test_every_normalized_kind_has_defaults() {
        for kind in ComponentKind::NORMALIZED {
            assert!(kind.normalized_defaults().is_some(), "{kind}");
            assert!(kind.template().is_some(), "{kind}");
        }
        assert!(ComponentKind::Path.normalized_defaults().is_none());
        assert!(ComponentKind::Unknown("x".into()).normalized_defaults().is_none());
        assert!(ComponentKind::Unknown("x".into()).template().is_none());
    }

    #[test]
    fn test_label_defaults() {
        let defaults = ComponentKind::Label.normalized_defaults().unwrap();
        assert_eq!(defaults.get("color"), Some(&json!("#ffffff")));
        assert_eq!(defaults.get("backgroundColor"), Some(&json!("#000000")));
        assert_eq!(defaults.get("padding"), Some(&json!("2px")));
        assert_eq!(defaults.get("text"), Some(&json!("")));
        assert_eq!(defaults.get("fontSize"), Some(&json!("12px")));
        assert!(defaults.get("position").is_none());
    }
}
