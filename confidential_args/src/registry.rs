//! Append-only registry of published computation schemas.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RegistryError;
use crate::schema::ParameterSchema;

/// Derive the 32-bit offset of a computation from its name.
///
/// The offset is the little-endian `u32` formed by the first four bytes of
/// `SHA-256(name)`.
pub fn computation_offset(name: &str) -> u32 {
    let digest = Sha256::digest(name.as_bytes());
    u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Identifier of a published computation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputationId {
    name: String,
    offset: u32,
}

impl ComputationId {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let offset = computation_offset(&name);
        Self { name, offset }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }
}

impl fmt::Display for ComputationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#010x})", self.name, self.offset)
    }
}

#[derive(Default)]
struct Published {
    order: Vec<Arc<ParameterSchema>>,
    by_name: HashMap<String, Arc<ParameterSchema>>,
    by_offset: HashMap<u32, Arc<ParameterSchema>>,
}

/// Published schemas, shared by encoder and decoder call sites.
///
/// Schemas are never replaced or removed once published; a changed signature
/// is published under a new computation name.
#[derive(Default)]
pub struct SchemaRegistry {
    inner: RwLock<Published>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry by publishing every schema in order.
    pub fn from_schemas(
        schemas: impl IntoIterator<Item = ParameterSchema>,
    ) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for schema in schemas {
            registry.publish(schema)?;
        }
        Ok(registry)
    }

    /// Validate and publish a schema.
    pub fn publish(&self, schema: ParameterSchema) -> Result<ComputationId, RegistryError> {
        schema.validate()?;
        let id = ComputationId::new(schema.computation());

        let mut published = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if published.by_name.contains_key(id.name()) {
            return Err(RegistryError::AlreadyPublished {
                computation: id.name().to_string(),
            });
        }
        if let Some(existing) = published.by_offset.get(&id.offset()) {
            return Err(RegistryError::OffsetCollision {
                computation: id.name().to_string(),
                existing: existing.computation().to_string(),
                offset: id.offset(),
            });
        }

        let parameter_count = schema.parameters().len();
        let schema = Arc::new(schema);
        published.order.push(Arc::clone(&schema));
        published
            .by_name
            .insert(id.name().to_string(), Arc::clone(&schema));
        published.by_offset.insert(id.offset(), schema);
        info!("Published computation {id} with {parameter_count} parameters");
        Ok(id)
    }

    pub fn get(&self, computation: &str) -> Option<Arc<ParameterSchema>> {
        let published = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        published.by_name.get(computation).cloned()
    }

    pub fn get_by_offset(&self, offset: u32) -> Option<Arc<ParameterSchema>> {
        let published = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        published.by_offset.get(&offset).cloned()
    }

    /// Snapshot of every published schema, in publication order.
    pub fn schemas(&self) -> Vec<Arc<ParameterSchema>> {
        let published = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        published.order.clone()
    }

    pub fn len(&self) -> usize {
        let published = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        published.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .schemas()
            .iter()
            .map(|s| s.computation().to_string())
            .collect();
        f.debug_struct("SchemaRegistry")
            .field("computations", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BitWidth;

    #[test]
    fn test_offset_is_stable() {
        assert_eq!(computation_offset("check_balance"), computation_offset("check_balance"));
        assert_ne!(computation_offset("check_balance"), computation_offset("process_payment"));
    }

    #[test]
    fn test_offset_uses_le_sha256_prefix() {
        // SHA-256("abc") begins ba 78 16 bf.
        assert_eq!(computation_offset("abc"), 0xbf16_78ba);
    }

    #[test]
    fn test_computation_id_display() {
        let id = ComputationId::new("abc");
        assert_eq!(id.to_string(), "abc (0xbf1678ba)");
    }

    #[test]
    fn test_lookup_by_offset() {
        let registry = SchemaRegistry::new();
        let schema = ParameterSchema::builder("abc")
            .scalar("x", BitWidth::U8)
            .build()
            .unwrap();
        let id = registry.publish(schema).unwrap();
        let found = registry.get_by_offset(id.offset()).unwrap();
        assert_eq!(found.computation(), "abc");
    }
}
