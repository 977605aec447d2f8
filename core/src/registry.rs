//! Type registry: classes, interfaces and instance-of checks.
//!
//! Object values may carry a [`Class`]. A literal string spec tested against
//! such an object is read as a class or interface name and accepts iff the
//! object's class *is-a* that name (reflexive, transitive over parents).
//! Against any other value the string is an ordinary literal.
//!
//! The registry is where classes come from. Declare the hierarchy once with
//! [`TypeRegistryBuilder`], then build objects with [`TypeRegistry::instantiate`]
//! and explicit instance-of specs with [`TypeRegistry::class_spec`].
//!
//! While a registry is active on the current thread ([`TypeRegistry::scope`],
//! [`TypeRegistry::enter`]) every name it declares is an instance-of check for
//! *any* value: a plain string equal to a declared name is rejected.
//!
//! # Example
//!
//! ```
//! use patma::{is, TypeRegistry, Value};
//!
//! let registry = TypeRegistry::builder()
//!     .interface("Shape")
//!     .class("Circle", ["Shape"])
//!     .build()
//!     .unwrap();
//!
//! let circle = registry.instantiate("Circle", [("r", Value::from(2))]).unwrap();
//! registry.scope(|| {
//!     assert!(is(&"Shape".into(), &circle));
//!     assert!(is(&"Circle".into(), &circle));
//!     assert!(!is(&"Square".into(), &circle));
//!     assert!(!is(&"Circle".into(), &Value::from("Circle")));
//! });
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Container, Key, Matchable, SpecError, TypeSpec, Value};

// ═══════════════════════════════════════════════════════════════════════════════
// Class
// ═══════════════════════════════════════════════════════════════════════════════

/// A named class or interface with its direct parents.
#[derive(Debug, PartialEq, Eq)]
pub struct Class {
    name: String,
    interface: bool,
    parents: Vec<Rc<Class>>,
}

impl Class {
    /// Create a class with the given parents.
    pub fn new(name: impl Into<String>, parents: impl IntoIterator<Item = Rc<Class>>) -> Self {
        Self {
            name: name.into(),
            interface: false,
            parents: parents.into_iter().collect(),
        }
    }

    /// The class name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if declared as an interface.
    #[inline]
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.interface
    }

    /// Direct parents, in declaration order.
    #[must_use]
    pub fn parents(&self) -> &[Rc<Class>] {
        &self.parents
    }

    /// Returns `true` if this class is `name` or inherits from it.
    #[must_use]
    pub fn is_a(&self, name: &str) -> bool {
        self.name == name || self.parents.iter().any(|parent| parent.is_a(name))
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Returns `true` if `value` is an object whose class is-a `name`.
pub(crate) fn instance_of(value: &Value, name: &str) -> bool {
    value
        .as_container()
        .and_then(Container::class)
        .is_some_and(|class| class.is_a(name))
}

/// Instance-of check as a custom spec leaf.
///
/// Unlike a bare string spec, an `InstanceOf` needs no active registry: a
/// plain string equal to the class name is always rejected.
#[derive(Debug, Clone)]
pub struct InstanceOf {
    class: Rc<Class>,
}

impl InstanceOf {
    /// The class being checked.
    #[must_use]
    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }
}

impl Matchable for InstanceOf {
    fn accepts(&self, value: &Value) -> bool {
        instance_of(value, self.class.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

struct Declaration {
    name: String,
    interface: bool,
    parents: Vec<String>,
}

/// Builder for a [`TypeRegistry`].
///
/// Parents must be declared before their children. The registry is immutable
/// once built.
#[derive(Default)]
pub struct TypeRegistryBuilder {
    declarations: Vec<Declaration>,
}

impl TypeRegistryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an interface with no parents.
    #[must_use]
    pub fn interface(mut self, name: &str) -> Self {
        self.declarations.push(Declaration {
            name: name.to_owned(),
            interface: true,
            parents: Vec::new(),
        });
        self
    }

    /// Declare an interface extending other interfaces.
    #[must_use]
    pub fn interface_extending<'a>(
        mut self,
        name: &str,
        parents: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.declarations.push(Declaration {
            name: name.to_owned(),
            interface: true,
            parents: parents.into_iter().map(str::to_owned).collect(),
        });
        self
    }

    /// Declare a class with its parent classes and interfaces.
    #[must_use]
    pub fn class<'a>(mut self, name: &str, parents: impl IntoIterator<Item = &'a str>) -> Self {
        self.declarations.push(Declaration {
            name: name.to_owned(),
            interface: false,
            parents: parents.into_iter().map(str::to_owned).collect(),
        });
        self
    }

    /// Resolve every declaration into an immutable registry.
    ///
    /// # Errors
    ///
    /// - [`SpecError::DuplicateType`] if a name is declared twice
    /// - [`SpecError::UnknownType`] if a parent was not declared earlier
    pub fn build(self) -> Result<TypeRegistry, SpecError> {
        let mut classes: HashMap<String, Rc<Class>> =
            HashMap::with_capacity(self.declarations.len());
        for decl in self.declarations {
            if classes.contains_key(&decl.name) {
                return Err(SpecError::DuplicateType { name: decl.name });
            }
            let mut parents = Vec::with_capacity(decl.parents.len());
            for parent in &decl.parents {
                match classes.get(parent) {
                    Some(class) => parents.push(Rc::clone(class)),
                    None => return Err(unknown(parent, &classes)),
                }
            }
            let class = Class {
                name: decl.name.clone(),
                interface: decl.interface,
                parents,
            };
            classes.insert(decl.name, Rc::new(class));
        }
        tracing::debug!(target: "patma", types = classes.len(), "type registry built");
        Ok(TypeRegistry {
            classes: Rc::new(classes),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

fn unknown(name: &str, classes: &HashMap<String, Rc<Class>>) -> SpecError {
    let mut available: Vec<String> = classes.keys().cloned().collect();
    available.sort_unstable();
    SpecError::UnknownType {
        name: name.to_owned(),
        available,
    }
}

thread_local! {
    static ACTIVE: RefCell<Option<TypeRegistry>> = const { RefCell::new(None) };
}

/// Returns `true` if the registry active on this thread declares `name`.
pub(crate) fn is_declared(name: &str) -> bool {
    ACTIVE.with(|active| active.borrow().as_ref().is_some_and(|r| r.contains(name)))
}

/// Immutable set of declared classes and interfaces.
///
/// Cheap to clone: the class table is shared.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: Rc<HashMap<String, Rc<Class>>>,
}

impl TypeRegistry {
    /// Start declaring a registry.
    #[must_use]
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::new()
    }

    /// Look up a class or interface by name.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownType`] listing the registered names.
    pub fn get(&self, name: &str) -> Result<&Rc<Class>, SpecError> {
        self.classes
            .get(name)
            .ok_or_else(|| unknown(name, &self.classes))
    }

    /// Make this registry the one string specs resolve against on this
    /// thread, until the returned guard is dropped.
    ///
    /// Guards nest: dropping one restores the registry that was active
    /// before it.
    #[must_use = "the registry is deactivated when the guard is dropped"]
    pub fn enter(&self) -> RegistryGuard {
        let previous = ACTIVE.with(|active| active.replace(Some(self.clone())));
        tracing::trace!(target: "patma", types = self.len(), "type registry entered");
        RegistryGuard { previous }
    }

    /// Run `f` with this registry active.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.enter();
        f()
    }

    /// Returns `true` if the name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Declared names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Build an object of the named class from its fields.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownType`] if the class is not declared.
    pub fn instantiate<K: Into<Key>>(
        &self,
        name: &str,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Result<Value, SpecError> {
        let mut object = Container::object(Some(Rc::clone(self.get(name)?)));
        for (key, value) in fields {
            object.insert(key, value);
        }
        Ok(Value::Container(object))
    }

    /// An explicit instance-of spec for the named class or interface.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownType`] if the name is not declared.
    pub fn class_spec(&self, name: &str) -> Result<TypeSpec, SpecError> {
        let class = Rc::clone(self.get(name)?);
        Ok(TypeSpec::custom(InstanceOf { class }))
    }

    /// Returns `true` if `value` is an instance of the named type.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::UnknownType`] if the name is not declared.
    pub fn is_instance(&self, value: &Value, name: &str) -> Result<bool, SpecError> {
        self.get(name)?;
        Ok(instance_of(value, name))
    }
}

/// Keeps a [`TypeRegistry`] active; see [`TypeRegistry::enter`].
#[derive(Debug)]
pub struct RegistryGuard {
    previous: Option<TypeRegistry>,
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        ACTIVE.with(|active| *active.borrow_mut() = previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is;

    fn shapes() -> TypeRegistry {
        TypeRegistry::builder()
            .interface("Shape")
            .interface_extending("Polygon", ["Shape"])
            .class("Square", ["Polygon"])
            .class("Circle", ["Shape"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_is_a_is_transitive() {
        let registry = shapes();
        let square = registry.get("Square").unwrap();
        assert!(square.is_a("Square"));
        assert!(square.is_a("Polygon"));
        assert!(square.is_a("Shape"));
        assert!(!square.is_a("Circle"));
        assert!(registry.get("Polygon").unwrap().is_interface());
    }

    #[test]
    fn test_names_are_sorted() {
        let registry = shapes();
        assert_eq!(registry.names(), vec!["Circle", "Polygon", "Shape", "Square"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let err = TypeRegistry::builder()
            .class("Square", ["Polygon"])
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SpecError::UnknownType {
                name: "Polygon".into(),
                available: vec![],
            }
        );
    }

    #[test]
    fn test_duplicate_is_rejected() {
        let err = TypeRegistry::builder()
            .interface("Shape")
            .class("Shape", [])
            .build()
            .unwrap_err();
        assert_eq!(err, SpecError::DuplicateType { name: "Shape".into() });
    }

    #[test]
    fn test_unknown_lookup_lists_available() {
        let registry = shapes();
        match registry.instantiate::<&str>("Triangle", []) {
            Err(SpecError::UnknownType { name, available }) => {
                assert_eq!(name, "Triangle");
                assert_eq!(available, vec!["Circle", "Polygon", "Shape", "Square"]);
            }
            other => panic!("expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_class_name_literal_against_object() {
        let registry = shapes();
        let square = registry.instantiate("Square", [("side", Value::from(2))]).unwrap();
        assert!(is(&"Polygon".into(), &square));
        assert!(!is(&"Circle".into(), &square));
    }

    #[test]
    fn test_declared_name_rejects_non_instances() {
        let registry = shapes();
        registry.scope(|| {
            assert!(!is(&"Circle".into(), &Value::from("Circle")));
            assert!(!is(&"Shape".into(), &Value::Null));
            assert!(!is(&"Shape".into(), &Value::map([("side", 2)])));
            // undeclared names are still literals
            assert!(is(&"Triangle".into(), &Value::from("Triangle")));
        });
    }

    #[test]
    fn test_guards_nest_and_restore() {
        let outer = shapes();
        let inner = TypeRegistry::builder().class("Triangle", []).build().unwrap();
        assert!(!is_declared("Circle"));
        {
            let _outer = outer.enter();
            assert!(is_declared("Circle"));
            {
                let _inner = inner.enter();
                assert!(is_declared("Triangle"));
                assert!(!is_declared("Circle"));
            }
            assert!(is_declared("Circle"));
            assert!(!is_declared("Triangle"));
        }
        assert!(!is_declared("Circle"));
    }

    #[test]
    fn test_class_spec_rejects_plain_strings() {
        let registry = shapes();
        let spec = registry.class_spec("Circle").unwrap();
        let circle = registry.instantiate::<&str>("Circle", []).unwrap();
        assert!(is(&spec, &circle));
        assert!(!is(&spec, &Value::from("Circle")));
        assert!(registry.is_instance(&circle, "Shape").unwrap());
        assert!(registry.is_instance(&circle, "Nope").is_err());
    }
}
