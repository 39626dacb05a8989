//! Resolved item references carried by a maintenance window.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

use crate::constants::tags;
use crate::errors::InvalidItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagType {
    #[serde(rename = "VLAN")]
    Vlan,
    #[serde(rename = "VLAN_QINQ")]
    VlanQinq,
    #[serde(rename = "MPLS")]
    Mpls,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Vlan => "VLAN",
            TagType::VlanQinq => "VLAN_QINQ",
            TagType::Mpls => "MPLS",
        }
    }

    pub fn parse(tag_type: &str) -> Result<Self, InvalidItem> {
        match tag_type {
            "VLAN" => Ok(TagType::Vlan),
            "VLAN_QINQ" => Ok(TagType::VlanQinq),
            "MPLS" => Ok(TagType::Mpls),
            other => Err(InvalidItem::UnknownTagType {
                tag_type: other.to_string(),
            }),
        }
    }

    fn value_range(&self) -> (u32, u32) {
        match self {
            TagType::Vlan | TagType::VlanQinq => (tags::VLAN_MIN, tags::VLAN_MAX),
            TagType::Mpls => (0, tags::MPLS_MAX),
        }
    }
}

impl fmt::Display for TagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub tag_type: TagType,
    pub value: u32,
}

impl Tag {
    /// Builds a tag after checking the value against the type's range.
    pub fn new(tag_type: TagType, value: i64) -> Result<Self, InvalidItem> {
        let (min, max) = tag_type.value_range();
        if value < min as i64 || value > max as i64 {
            return Err(InvalidItem::TagOutOfRange {
                tag_type: tag_type.to_string(),
                value,
            });
        }
        Ok(Self {
            tag_type,
            value: value as u32,
        })
    }
}

/// A network element targeted by a window, identified by id only.
///
/// The topology owns the element; a window just remembers which one to flag
/// and unflag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRef {
    Switch(String),
    Interface(String),
    TaggedInterface { interface_id: String, tag: Tag },
}

impl ItemRef {
    /// Canonical key used to compare items and to flag topology elements.
    pub fn element_key(&self) -> String {
        match self {
            ItemRef::Switch(id) => format!("switch:{}", id),
            ItemRef::Interface(id) => format!("interface:{}", id),
            ItemRef::TaggedInterface { interface_id, tag } => {
                format!("interface:{}:{}:{}", interface_id, tag.tag_type, tag.value)
            }
        }
    }

    /// Renders the item in the same shape the API accepts it.
    pub fn to_payload(&self) -> Value {
        match self {
            ItemRef::Switch(id) | ItemRef::Interface(id) => Value::String(id.clone()),
            ItemRef::TaggedInterface { interface_id, tag } => json!({
                "interface_id": interface_id,
                "tag": {
                    "tag_type": tag.tag_type.as_str(),
                    "value": tag.value,
                }
            }),
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.element_key())
    }
}
