//! Definition of the `Descriptor` type.

use crate::primitives::Symbol;

/// Descriptor of a described type: either the symbolic name or the numeric
/// code assigned to it by the AMQP type registry.
///
/// How are descriptors represented in other implementations?
/// 1. amqpnetlite: Symbol
/// 2. go-amqp: Symbol
/// 3. qpid-proton-j2: Symbol
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Descriptor {
    /// A symbolic descriptor, e.g. `"amqp:open:list"`.
    Symbolic(Symbol),
    /// A numeric descriptor packed as `(domain_id << 32) | descriptor_id`.
    Numeric(u64),
}

impl Descriptor {
    /// Builds a numeric descriptor from its domain and type id halves, per
    /// the `domain:id` hex-pair convention used by the schema's
    /// `descriptor code` attribute.
    pub fn from_domain_id(domain: u32, id: u32) -> Self {
        Descriptor::Numeric(((domain as u64) << 32) | id as u64)
    }

    /// The symbolic name, if this descriptor carries one.
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Descriptor::Symbolic(sym) => Some(sym),
            Descriptor::Numeric(_) => None,
        }
    }

    /// The numeric code, if this descriptor carries one.
    pub fn as_code(&self) -> Option<u64> {
        match self {
            Descriptor::Symbolic(_) => None,
            Descriptor::Numeric(code) => Some(*code),
        }
    }
}

impl From<Symbol> for Descriptor {
    fn from(sym: Symbol) -> Self {
        Descriptor::Symbolic(sym)
    }
}

impl From<u64> for Descriptor {
    fn from(code: u64) -> Self {
        Descriptor::Numeric(code)
    }
}

#[cfg(test)]
mod tests {
    use super::Descriptor;
    use crate::primitives::Symbol;

    #[test]
    fn domain_id_packs_into_numeric_code() {
        let descriptor = Descriptor::from_domain_id(0x0000_0002, 0x0000_0007);
        assert_eq!(descriptor.as_code(), Some(0x0000_0002_0000_0007));
    }

    #[test]
    fn symbolic_round_trips_through_as_symbol() {
        let descriptor = Descriptor::from(Symbol::from("amqp:open:list"));
        assert_eq!(descriptor.as_symbol(), Some(&Symbol::from("amqp:open:list")));
        assert_eq!(descriptor.as_code(), None);
    }
}
