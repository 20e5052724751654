//! The schema registry: a lookup table from type name, format code, and
//! descriptor to the [`Meta`] record that describes a type.
//!
//! The registry is an explicit collaborator passed to every schema-driven
//! operation rather than implicit global state, while still offering a
//! lazily built process-default for callers who only need the bundled
//! primitive catalogue.
//!
//! # Concurrency contract
//!
//! `Registry` has no internal locking: building one and calling
//! [`Registry::load_schema_xml`] both require `&mut Registry`, so populating
//! a registry is a single-writer operation the caller must serialize
//! externally if shared across threads during construction. Once built, all
//! lookup and `create`/`decode_schema` methods take `&self` and are safe to
//! call concurrently from many threads — this is what makes
//! [`Registry::default_for_process`] (a `&'static Registry` built once
//! behind `once_cell::sync::Lazy`) safe to hand out freely.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::descriptor::Descriptor;
use crate::error::Error;
use crate::meta::{Input, Meta};
use crate::node::Node;
use crate::value::Value;

/// A populated schema: every [`Meta`] this process or caller has registered,
/// indexed three ways.
#[derive(Debug, Default)]
pub struct Registry {
    by_name: HashMap<String, Arc<Meta>>,
    by_code: HashMap<u8, Arc<Meta>>,
    by_symbolic: HashMap<String, Arc<Meta>>,
    by_numeric: HashMap<u64, Arc<Meta>>,
}

static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(Registry::with_defaults);

impl Registry {
    /// An empty registry with no registered types.
    pub fn new() -> Self {
        Registry::default()
    }

    /// A registry preloaded with the bundled primitive catalogue
    /// (`schema/types.xml`).
    pub fn with_defaults() -> Self {
        let mut registry = Registry::new();
        registry
            .load_schema_xml(include_str!("../schema/types.xml"))
            .expect("bundled schema/types.xml must be well-formed");
        registry
    }

    /// A lazily built, process-wide default registry carrying just the
    /// bundled primitive catalogue. Safe to share across threads; see the
    /// module-level concurrency contract.
    pub fn default_for_process() -> &'static Registry {
        &DEFAULT_REGISTRY
    }

    /// Registers `meta`, indexing it by name and, where applicable, by
    /// format code (primitives) or descriptor (composite/restricted).
    /// Re-registering a name already present overwrites the prior entry.
    pub fn register(&mut self, meta: Meta) {
        let meta = Arc::new(meta);
        tracing::debug!(type_name = meta.type_name(), "registering schema type");

        for encoding in meta.encodings() {
            self.by_code.insert(encoding.code, meta.clone());
        }
        // A type's descriptor may carry a symbolic half, a numeric half, or
        // both (the common case for named AMQP types) — register under
        // every key it carries so lookup by either form succeeds.
        if let Some(descriptor) = meta.descriptor() {
            match descriptor {
                Descriptor::Symbolic(sym) => {
                    self.by_symbolic.insert(sym.as_str().to_string(), meta.clone());
                }
                Descriptor::Numeric(code) => {
                    self.by_numeric.insert(*code, meta.clone());
                }
            }
        }
        if let Some(Descriptor::Numeric(code)) = meta.numeric_descriptor() {
            self.by_numeric.insert(*code, meta.clone());
        }
        self.by_name.insert(meta.type_name().to_string(), meta);
    }

    /// Looks up a registered type by name.
    pub fn get_by_name(&self, name: &str) -> Option<&Arc<Meta>> {
        self.by_name.get(name)
    }

    /// Looks up the primitive registered for a bare format code.
    pub fn get_by_code(&self, code: u8) -> Option<&Arc<Meta>> {
        self.by_code.get(&code)
    }

    /// Looks up a composite/restricted type by its wire descriptor.
    pub fn get_by_descriptor(&self, descriptor: &Descriptor) -> Option<&Arc<Meta>> {
        match descriptor {
            Descriptor::Symbolic(sym) => self.by_symbolic.get(sym.as_str()),
            Descriptor::Numeric(code) => self.by_numeric.get(code),
        }
    }

    /// Loads every `<type>` declared in the schema document at `path`.
    pub fn load_schema_file(&mut self, path: &Path) -> Result<(), Error> {
        let document = std::fs::read_to_string(path).map_err(|err| {
            Error::SchemaSyntax(format!("could not read {}: {err}", path.display()))
        })?;
        self.load_schema_xml(&document)
    }

    /// Parses `document` as a schema XML document and registers every
    /// `<type>` it declares.
    pub fn load_schema_xml(&mut self, document: &str) -> Result<(), Error> {
        let metas = crate::schema::parse(document)?;
        for meta in metas {
            self.register(meta);
        }
        Ok(())
    }

    /// Builds a value of the named type from `input`, per `Meta::create`.
    pub fn create(&self, type_name: &str, input: Input) -> Result<Value, Error> {
        let meta = self
            .get_by_name(type_name)
            .ok_or_else(|| Error::EncoderMissing(type_name.to_string()))?
            .clone();
        meta.create(self, input)
    }

    /// Reports whether `input` can be built as the named type, without
    /// propagating the underlying validation error to the caller.
    pub fn encodable(&self, type_name: &str, input: Input) -> Result<bool, Error> {
        match self.create(type_name, input) {
            Ok(_) => Ok(true),
            Err(Error::Validation(_)) | Err(Error::Type(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Decodes `node` (parsed from `bytes`) into a schema-aware [`Value`],
    /// resolving each node's type via descriptor-first lookup: numeric
    /// descriptor, then symbolic descriptor, then bare format code. An
    /// unresolvable descriptor or format code fails with
    /// [`crate::error::DecodeError::UnknownDescriptor`].
    pub fn decode_schema(&self, node: &Node, bytes: &[u8]) -> Result<Value, Error> {
        crate::decoder::decode_schema(self, node, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_resolves_ubyte_by_code() {
        let registry = Registry::default_for_process();
        assert!(registry.get_by_code(0x50).is_some());
        assert_eq!(registry.get_by_name("ubyte").unwrap().type_name(), "ubyte");
    }

    #[test]
    fn register_overwrites_existing_name() {
        use crate::meta::Encoding;
        let mut registry = Registry::new();
        registry.register(Meta::primitive(
            "widget".to_string(),
            "fixed".to_string(),
            vec![Encoding {
                category: "fixed".to_string(),
                code: 0x99,
                width: 1,
            }],
        ));
        assert!(registry.get_by_code(0x99).is_some());
        registry.register(Meta::primitive(
            "widget".to_string(),
            "fixed".to_string(),
            vec![Encoding {
                category: "fixed".to_string(),
                code: 0x9a,
                width: 1,
            }],
        ));
        assert_eq!(registry.get_by_name("widget").unwrap().encodings()[0].code, 0x9a);
    }
}
