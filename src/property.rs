//! Folder properties.
//!
//! Folders fetched with properties carry a list of raw property objects. The
//! service is loosely typed: numbers arrive as strings, flags as `0`/`1` and
//! lists as `|`-separated text. [`Property::from_raw`] turns these into typed
//! values and rejects anything it cannot convert instead of guessing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Separator used by the service for multi-valued properties
pub const LIST_DELIMITER: char = '|';

#[derive(Debug, Error, PartialEq)]
pub enum PropertyError {
    #[error("property {system_name:?} has an invalid {value_type} value: {raw}")]
    InvalidValue {
        system_name: String,
        value_type: PropertyValueType,
        raw: String,
    },
    #[error("property {system_name:?} has an invalid {field:?} field: {raw}")]
    InvalidField {
        system_name: String,
        field: String,
        raw: String,
    },
    #[error("property {system_name:?} is missing the {field:?} field")]
    MissingField { system_name: String, field: String },
}

/// The type of a property's value and default value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PropertyValueType {
    /// A list of choices, or a single one when not multiple choice
    #[serde(rename = "arr")]
    #[strum(serialize = "arr")]
    Array,
    #[serde(rename = "int")]
    #[strum(serialize = "int")]
    Int,
    #[serde(rename = "float")]
    #[strum(serialize = "float")]
    Float,
    /// A date as formatted by the service
    #[serde(rename = "date")]
    #[strum(serialize = "date")]
    Date,
    #[serde(rename = "bool")]
    #[strum(serialize = "bool")]
    Bool,
    #[serde(rename = "str")]
    #[strum(serialize = "str")]
    String,
}

impl PropertyValueType {
    /// Map the service's type name to a value type.
    ///
    /// Text-like types (`str`, `text`, `xml`, `label`) and unknown names map to `String`.
    pub fn from_service_name(name: &str) -> PropertyValueType {
        PropertyValueType::from_str(name).unwrap_or(PropertyValueType::String)
    }
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    List(Vec<String>),
    Bool(bool),
    Int(i64),
    Float(f64),
    Date(String),
}

/// A property object as sent by the service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawProperty {
    #[serde(rename = "propertyId", default)]
    pub property_id: Value,
    #[serde(default)]
    pub id: Value,
    #[serde(rename = "propertyTypeId", default)]
    pub property_type_id: Value,
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(rename = "defaultValue", default)]
    pub default_value: Value,
    #[serde(rename = "propertyType", default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub multiplechoice: Value,
    #[serde(default)]
    pub editable: Value,
    #[serde(default)]
    pub mandatory: Value,
    #[serde(default)]
    pub keywords: Value,
    #[serde(default)]
    pub link: Value,
    #[serde(default)]
    pub info: Option<String>,
    // Typed columns, sent instead of `propertyType`/`value` by some calls
    #[serde(rename = "arrValue", default)]
    pub arr_value: Value,
    #[serde(rename = "boolValue", default)]
    pub bool_value: Value,
    #[serde(rename = "dateValue", default)]
    pub date_value: Value,
    #[serde(rename = "floatValue", default)]
    pub float_value: Value,
    #[serde(rename = "labelValue", default)]
    pub label_value: Value,
    #[serde(rename = "intValue", default)]
    pub int_value: Value,
    #[serde(rename = "textValue", default)]
    pub text_value: Value,
    #[serde(rename = "xmlValue", default)]
    pub xml_value: Value,
    #[serde(rename = "strValue", default)]
    pub str_value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    id: u32,
    property_type_id: u32,
    system_name: String,
    title: String,
    value: Option<PropertyValue>,
    default_value: Option<PropertyValue>,
    value_type: PropertyValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    qbank_value_type: Option<String>,
    multiple_choice: bool,
    editable: Option<bool>,
    mandatory: Option<bool>,
    keywords: Option<bool>,
    link: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    info: Option<String>,
}

impl Property {
    pub fn new(
        id: u32,
        property_type_id: u32,
        system_name: String,
        title: String,
        value: Option<PropertyValue>,
        value_type: PropertyValueType,
    ) -> Property {
        Property {
            id,
            property_type_id,
            system_name,
            title,
            value,
            default_value: None,
            value_type,
            qbank_value_type: None,
            multiple_choice: false,
            editable: None,
            mandatory: None,
            keywords: None,
            link: None,
            info: None,
        }
    }

    /// Convert a property object received from the service.
    ///
    /// When the object names its `propertyType`, `value` and `defaultValue` are
    /// converted to that type. Otherwise the typed value columns are probed and
    /// the first one holding a value decides the type.
    pub fn from_raw(raw: &RawProperty) -> Result<Property, PropertyError> {
        match &raw.property_type {
            Some(type_name) => Self::from_typed_raw(raw, type_name),
            None => Self::from_column_raw(raw),
        }
    }

    fn from_typed_raw(raw: &RawProperty, type_name: &str) -> Result<Property, PropertyError> {
        let name = &raw.property_name;
        let value_type = PropertyValueType::from_service_name(type_name);
        let multiple_choice = parse_flag(name, "multiplechoice", &raw.multiplechoice)?.unwrap_or(false);
        let keywords = parse_flag(name, "keywords", &raw.keywords)?;

        let (value, default_value) = match value_type {
            PropertyValueType::Array => {
                let value = if multiple_choice {
                    split_list(&raw.value)
                } else {
                    text(&raw.value).map(PropertyValue::Text)
                };
                (value, split_list(&raw.default_value))
            }
            PropertyValueType::String if keywords == Some(true) => {
                (split_list(&raw.value), split_list(&raw.default_value))
            }
            _ => (
                convert(name, value_type, &raw.value)?,
                convert(name, value_type, &raw.default_value)?,
            ),
        };

        Ok(Property {
            id: parse_id(name, "propertyId", &raw.property_id)?,
            property_type_id: parse_id(name, "id", &raw.id)?,
            system_name: name.clone(),
            title: raw.title.clone().unwrap_or_default(),
            value,
            default_value,
            value_type,
            qbank_value_type: Some(type_name.to_string()),
            multiple_choice,
            editable: parse_flag(name, "editable", &raw.editable)?,
            mandatory: parse_flag(name, "mandatory", &raw.mandatory)?,
            keywords,
            link: parse_flag(name, "link", &raw.link)?,
            info: raw.info.clone().filter(|info| !info.is_empty()),
        })
    }

    fn from_column_raw(raw: &RawProperty) -> Result<Property, PropertyError> {
        let name = &raw.property_name;

        let (value, value_type) = if let Some(PropertyValue::List(items)) = split_list(&raw.arr_value) {
            let items = items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            (Some(PropertyValue::List(items)), PropertyValueType::Array)
        } else if !raw.bool_value.is_null() {
            (convert(name, PropertyValueType::Bool, &raw.bool_value)?, PropertyValueType::Bool)
        } else if text(&raw.date_value).is_some() {
            (convert(name, PropertyValueType::Date, &raw.date_value)?, PropertyValueType::Date)
        } else if !raw.float_value.is_null() {
            (convert(name, PropertyValueType::Float, &raw.float_value)?, PropertyValueType::Float)
        } else if let Some(label) = text(&raw.label_value) {
            (Some(PropertyValue::Text(label)), PropertyValueType::String)
        } else if !raw.int_value.is_null() {
            (convert(name, PropertyValueType::Int, &raw.int_value)?, PropertyValueType::Int)
        } else if let Some(text_value) = text(&raw.text_value) {
            (Some(PropertyValue::Text(text_value)), PropertyValueType::String)
        } else if let Some(xml) = text(&raw.xml_value) {
            (Some(PropertyValue::Text(xml)), PropertyValueType::String)
        } else {
            (text(&raw.str_value).map(PropertyValue::Text), PropertyValueType::String)
        };

        Self::column_property(raw, value, value_type)
    }

    fn column_property(
        raw: &RawProperty,
        value: Option<PropertyValue>,
        value_type: PropertyValueType,
    ) -> Result<Property, PropertyError> {
        let name = &raw.property_name;
        Ok(Property::new(
            parse_id(name, "id", &raw.id)?,
            parse_id(name, "propertyTypeId", &raw.property_type_id)?,
            name.clone(),
            raw.title.clone().unwrap_or_default(),
            value,
            value_type,
        ))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn property_type_id(&self) -> u32 {
        self.property_type_id
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub fn default_value(&self) -> Option<&PropertyValue> {
        self.default_value.as_ref()
    }

    pub fn value_type(&self) -> PropertyValueType {
        self.value_type
    }

    /// The type name exactly as the service sent it
    pub fn qbank_value_type(&self) -> Option<&str> {
        self.qbank_value_type.as_deref()
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.multiple_choice
    }

    pub fn is_editable(&self) -> Option<bool> {
        self.editable
    }

    pub fn is_mandatory(&self) -> Option<bool> {
        self.mandatory
    }

    pub fn is_keywords(&self) -> Option<bool> {
        self.keywords
    }

    pub fn is_link(&self) -> Option<bool> {
        self.link
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// System properties are named `system_*` by the service
    pub fn is_system_property(&self) -> bool {
        self.system_name.to_lowercase().contains("system_")
    }
}

/// Text form of a scalar value; `None` for null and empty strings
fn text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn split_list(value: &Value) -> Option<PropertyValue> {
    let items: Vec<String> = text(value)?
        .split(LIST_DELIMITER)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(PropertyValue::List(items))
    }
}

fn convert(
    system_name: &str,
    value_type: PropertyValueType,
    value: &Value,
) -> Result<Option<PropertyValue>, PropertyError> {
    let invalid = || PropertyError::InvalidValue {
        system_name: system_name.to_string(),
        value_type,
        raw: value.to_string(),
    };

    let converted = match value_type {
        PropertyValueType::Bool => match value {
            Value::Null => None,
            Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(PropertyValue::Bool(false)),
                Some(1) => Some(PropertyValue::Bool(true)),
                _ => return Err(invalid()),
            },
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "" | "0" | "false" => Some(PropertyValue::Bool(false)),
                "1" | "true" => Some(PropertyValue::Bool(true)),
                _ => return Err(invalid()),
            },
            _ => return Err(invalid()),
        },
        PropertyValueType::Int => match value {
            Value::Number(n) => Some(PropertyValue::Int(n.as_i64().ok_or_else(invalid)?)),
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(PropertyValue::Int(s.trim().parse().map_err(|_| invalid())?)),
            Value::Null => None,
            _ => return Err(invalid()),
        },
        PropertyValueType::Float => match value {
            Value::Number(n) => Some(PropertyValue::Float(n.as_f64().ok_or_else(invalid)?)),
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(PropertyValue::Float(s.trim().parse().map_err(|_| invalid())?)),
            Value::Null => None,
            _ => return Err(invalid()),
        },
        PropertyValueType::Date => text(value).map(PropertyValue::Date),
        PropertyValueType::Array | PropertyValueType::String => text(value).map(PropertyValue::Text),
    };
    Ok(converted)
}

fn parse_id(system_name: &str, field: &str, value: &Value) -> Result<u32, PropertyError> {
    let invalid = || PropertyError::InvalidField {
        system_name: system_name.to_string(),
        field: field.to_string(),
        raw: value.to_string(),
    };

    match value {
        Value::Null => Err(PropertyError::MissingField {
            system_name: system_name.to_string(),
            field: field.to_string(),
        }),
        Value::Number(n) => n
            .as_u64()
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(invalid),
        Value::String(s) => s.trim().parse().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn parse_flag(system_name: &str, field: &str, value: &Value) -> Result<Option<bool>, PropertyError> {
    match value {
        Value::Null => Ok(None),
        _ => match convert(system_name, PropertyValueType::Bool, value) {
            Ok(Some(PropertyValue::Bool(flag))) => Ok(Some(flag)),
            Ok(_) => Ok(None),
            Err(_) => Err(PropertyError::InvalidField {
                system_name: system_name.to_string(),
                field: field.to_string(),
                raw: value.to_string(),
            }),
        },
    }
}
