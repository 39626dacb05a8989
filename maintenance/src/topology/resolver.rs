//! Item descriptor resolution
//!
//! Accepted descriptor forms:
//! - `"<switch-or-interface-id>"`
//! - `{"interface_id": "<id>", "tag": {"tag_type": "VLAN", "value": 241}}` (tag optional)

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use super::Topology;
use crate::errors::InvalidItem;
use crate::window::{ItemRef, Tag, TagType};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InterfaceDescriptor {
    interface_id: String,
    #[serde(default)]
    tag: Option<TagDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TagDescriptor {
    tag_type: String,
    value: i64,
}

/// Pure lookup of item descriptors against the live topology
#[derive(Clone)]
pub struct ItemResolver {
    topology: Arc<dyn Topology>,
}

impl ItemResolver {
    pub fn new(topology: Arc<dyn Topology>) -> Self {
        Self { topology }
    }

    pub async fn resolve(&self, descriptor: &Value) -> Result<ItemRef, InvalidItem> {
        match descriptor {
            Value::String(id) => self.resolve_id(id).await,
            Value::Object(_) => {
                let parsed: InterfaceDescriptor = serde_json::from_value(descriptor.clone())
                    .map_err(|e| InvalidItem::Malformed {
                        reason: e.to_string(),
                    })?;
                self.resolve_interface(parsed).await
            }
            other => Err(InvalidItem::Malformed {
                reason: format!("expected string or object, got {}", other),
            }),
        }
    }

    /// Resolves each descriptor independently, keeping input order.
    pub async fn resolve_all(&self, descriptors: &[Value]) -> Vec<Result<ItemRef, InvalidItem>> {
        let mut resolved = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let result = self.resolve(descriptor).await;
            if let Err(e) = &result {
                debug!("Item {} rejected: {}", descriptor, e);
            }
            resolved.push(result);
        }
        resolved
    }

    async fn resolve_id(&self, id: &str) -> Result<ItemRef, InvalidItem> {
        if self.topology.contains_switch(id).await {
            Ok(ItemRef::Switch(id.to_string()))
        } else if self.topology.contains_interface(id).await {
            Ok(ItemRef::Interface(id.to_string()))
        } else {
            Err(InvalidItem::UnknownElement { id: id.to_string() })
        }
    }

    async fn resolve_interface(
        &self,
        descriptor: InterfaceDescriptor,
    ) -> Result<ItemRef, InvalidItem> {
        if !self.topology.contains_interface(&descriptor.interface_id).await {
            return Err(InvalidItem::UnknownInterface {
                interface_id: descriptor.interface_id,
            });
        }

        match descriptor.tag {
            None => Ok(ItemRef::Interface(descriptor.interface_id)),
            Some(tag) => {
                let tag_type = TagType::parse(&tag.tag_type)?;
                Ok(ItemRef::TaggedInterface {
                    interface_id: descriptor.interface_id,
                    tag: Tag::new(tag_type, tag.value)?,
                })
            }
        }
    }
}
