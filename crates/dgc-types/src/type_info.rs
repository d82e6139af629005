//! Runtime type descriptors.
//!
//! [`TypeInfo`] describes the runtime type of a value: a name, whether it is
//! a class or an interface, an optional superclass, and the interfaces it
//! directly implements. Descriptors form a small DAG that comparator
//! resolution walks to find the nearest registered ancestor.
//!
//! Type names are the identity of a descriptor: two descriptors with the
//! same name are assumed to describe the same type hierarchy. Callers should
//! share descriptors via `Rc` rather than rebuilding divergent ones under
//! one name.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Whether a type descriptor names a class or an interface.
///
/// The distinction only matters for comparator resolution tie-breaking:
/// at equal hierarchy distance, a class match is preferred over an
/// interface match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    /// A concrete or abstract class.
    Class,
    /// An interface (trait-like type with no instances of its own).
    Interface,
}

/// A runtime type descriptor.
#[derive(Debug)]
pub struct TypeInfo {
    name: String,
    kind: TypeKind,
    superclass: Option<Rc<TypeInfo>>,
    interfaces: Vec<Rc<TypeInfo>>,
}

/// One ancestor reachable from a type, with its traversal distance.
///
/// Produced by [`TypeInfo::closure`]. The queried type itself appears at
/// distance 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosureEntry {
    /// Name of the ancestor type.
    pub name: String,
    /// Class or interface.
    pub kind: TypeKind,
    /// Number of hierarchy edges from the queried type (0 = the type itself).
    pub distance: u32,
}

impl TypeInfo {
    /// Start building a class descriptor.
    pub fn class(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder {
            name: name.into(),
            kind: TypeKind::Class,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    /// Start building an interface descriptor.
    pub fn interface(name: impl Into<String>) -> TypeInfoBuilder {
        TypeInfoBuilder {
            name: name.into(),
            kind: TypeKind::Interface,
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    /// The type's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class or interface.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The direct superclass, if any.
    pub fn superclass(&self) -> Option<&Rc<TypeInfo>> {
        self.superclass.as_ref()
    }

    /// The directly implemented (or extended) interfaces.
    pub fn interfaces(&self) -> &[Rc<TypeInfo>] {
        &self.interfaces
    }

    /// Compute the supertype closure of this type: every ancestor class and
    /// interface reachable through superclass and interface edges, each with
    /// its minimal traversal distance.
    ///
    /// The result is in BFS discovery order, so entries are grouped by
    /// non-decreasing distance, with a node's superclass discovered before
    /// its interfaces at the same depth. Each name appears once, at its
    /// smallest distance.
    pub fn closure(&self) -> Vec<ClosureEntry> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut out = Vec::new();
        let mut queue: VecDeque<(Rc<TypeInfo>, u32)> = VecDeque::new();

        seen.insert(self.name.clone());
        out.push(ClosureEntry {
            name: self.name.clone(),
            kind: self.kind,
            distance: 0,
        });
        if let Some(superclass) = &self.superclass {
            queue.push_back((superclass.clone(), 1));
        }
        for iface in &self.interfaces {
            queue.push_back((iface.clone(), 1));
        }

        while let Some((current, distance)) = queue.pop_front() {
            if seen.insert(current.name.clone()) {
                out.push(ClosureEntry {
                    name: current.name.clone(),
                    kind: current.kind,
                    distance,
                });
                if let Some(superclass) = &current.superclass {
                    queue.push_back((superclass.clone(), distance + 1));
                }
                for iface in &current.interfaces {
                    queue.push_back((iface.clone(), distance + 1));
                }
            }
        }

        out
    }
}

/// Builder for [`TypeInfo`] descriptors.
#[derive(Debug)]
pub struct TypeInfoBuilder {
    name: String,
    kind: TypeKind,
    superclass: Option<Rc<TypeInfo>>,
    interfaces: Vec<Rc<TypeInfo>>,
}

impl TypeInfoBuilder {
    /// Set the superclass.
    pub fn extends(mut self, superclass: &Rc<TypeInfo>) -> Self {
        self.superclass = Some(superclass.clone());
        self
    }

    /// Add a directly implemented interface.
    pub fn implements(mut self, interface: &Rc<TypeInfo>) -> Self {
        self.interfaces.push(interface.clone());
        self
    }

    /// Finish the descriptor.
    pub fn build(self) -> Rc<TypeInfo> {
        Rc::new(TypeInfo {
            name: self.name,
            kind: self.kind,
            superclass: self.superclass,
            interfaces: self.interfaces,
        })
    }
}

/// Built-in descriptors for scalar and container values.
///
/// Numeric scalars share the `number` superclass so one comparator
/// registered for `number` covers `int`, `float`, and `decimal`. Lists and
/// sets implement the `collection` interface; the sorted container types
/// subclass their unsorted counterparts.
pub mod builtin {
    use super::{TypeInfo, TypeKind};
    use std::rc::Rc;

    /// Abstract supertype of all numeric scalars.
    pub fn number() -> Rc<TypeInfo> {
        TypeInfo::class("number").build()
    }

    /// 64-bit integers.
    pub fn int() -> Rc<TypeInfo> {
        TypeInfo::class("int").extends(&number()).build()
    }

    /// 64-bit floats.
    pub fn float() -> Rc<TypeInfo> {
        TypeInfo::class("float").extends(&number()).build()
    }

    /// Arbitrary-precision decimal literals.
    pub fn decimal() -> Rc<TypeInfo> {
        TypeInfo::class("decimal").extends(&number()).build()
    }

    /// Booleans.
    pub fn boolean() -> Rc<TypeInfo> {
        TypeInfo::class("bool").build()
    }

    /// Text strings.
    pub fn text() -> Rc<TypeInfo> {
        TypeInfo::class("text").build()
    }

    /// UTC timestamps.
    pub fn timestamp() -> Rc<TypeInfo> {
        TypeInfo::class("timestamp").build()
    }

    /// The null value.
    pub fn null() -> Rc<TypeInfo> {
        TypeInfo::class("null").build()
    }

    /// Common interface of lists and sets.
    pub fn collection() -> Rc<TypeInfo> {
        TypeInfo::interface("collection").build()
    }

    /// Fixed-length positional arrays.
    pub fn array() -> Rc<TypeInfo> {
        TypeInfo::class("array").build()
    }

    /// Ordered collections.
    pub fn list() -> Rc<TypeInfo> {
        TypeInfo::class("list").implements(&collection()).build()
    }

    /// Unordered sets with hash iteration order.
    pub fn set() -> Rc<TypeInfo> {
        TypeInfo::class("set").implements(&collection()).build()
    }

    /// Sets with a defined (sorted) iteration order.
    pub fn sorted_set() -> Rc<TypeInfo> {
        TypeInfo::class("sorted_set").extends(&set()).build()
    }

    /// Unordered maps with hash iteration order.
    pub fn map() -> Rc<TypeInfo> {
        TypeInfo::class("map").build()
    }

    /// Maps with a defined (sorted) key iteration order.
    pub fn sorted_map() -> Rc<TypeInfo> {
        TypeInfo::class("sorted_map").extends(&map()).build()
    }
}
