use crate::types::{
    ClassShape, InterfaceShape, MethodDeclaration, MethodSignature, Parameter, Property,
};

/// Result of a symbol lookup. Absence is represented, never signaled
/// as an error.
#[derive(Debug, PartialEq)]
pub enum Symbol<'a> {
    Interface(&'a InterfaceShape),
    Class(&'a ClassShape),
}

/// Insertion-ordered table of inferred interface and class shapes for
/// one document. The two sides form a single namespace: a name occupies
/// at most one of them at any time; promotion moves it from the
/// interface side to the class side atomically.
///
/// A table is private to one document's processing run and must be
/// freshly constructed per run.
#[derive(Debug, Default)]
pub struct SymbolTable {
    interfaces: Vec<(String, InterfaceShape)>,
    classes: Vec<(String, ClassShape)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or re-declare) a table-as-interface shape
    pub fn declare_interface(&mut self, name: impl Into<String>, properties: Vec<Property>) {
        let name = name.into();
        let shape = InterfaceShape {
            properties,
            methods: Vec::new(),
        };
        if let Some(entry) = self.interfaces.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = shape;
        } else if !self.classes.iter().any(|(n, _)| *n == name) {
            self.interfaces.push((name, shape));
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol<'_>> {
        if let Some((_, shape)) = self.interfaces.iter().find(|(n, _)| n.as_str() == name) {
            return Some(Symbol::Interface(shape));
        }
        if let Some((_, shape)) = self.classes.iter().find(|(n, _)| n.as_str() == name) {
            return Some(Symbol::Class(shape));
        }
        None
    }

    /// Promote an interface into a class: every method signature becomes
    /// a method declaration, the interface entry is deleted, and the
    /// interface's property names are returned so the caller can report
    /// the information loss. One-way and idempotent: promoting a name
    /// with no interface entry is a no-op returning `None`.
    pub fn promote(&mut self, name: &str) -> Option<Vec<String>> {
        let index = self.interfaces.iter().position(|(n, _)| n.as_str() == name)?;
        let (name, shape) = self.interfaces.remove(index);

        let dropped: Vec<String> = shape.properties.into_iter().map(|p| p.name).collect();
        let methods = shape
            .methods
            .into_iter()
            .map(|sig| MethodDeclaration {
                name: sig.name,
                parameters: sig.parameters,
                return_type: sig.return_type,
                is_static: false,
            })
            .collect();

        self.classes.push((
            name,
            ClassShape {
                constructors: Vec::new(),
                methods,
                properties: Vec::new(),
            },
        ));

        Some(dropped)
    }

    /// Append a method signature to an interface; duplicate names are
    /// ignored to keep names unique within the shape.
    pub fn record_interface_method(&mut self, name: &str, method: MethodSignature) {
        if let Some((_, shape)) = self.interfaces.iter_mut().find(|(n, _)| n.as_str() == name) {
            if !shape.has_method(&method.name) {
                shape.methods.push(method);
            }
        }
    }

    /// Append a method declaration to a class; duplicate names are ignored.
    pub fn record_class_method(&mut self, name: &str, method: MethodDeclaration) {
        if let Some((_, shape)) = self.classes.iter_mut().find(|(n, _)| n.as_str() == name) {
            if !shape.has_method(&method.name) {
                shape.methods.push(method);
            }
        }
    }

    pub fn record_constructor(&mut self, name: &str, parameters: Vec<Parameter>) {
        if let Some((_, shape)) = self.classes.iter_mut().find(|(n, _)| n.as_str() == name) {
            shape.constructors.push(parameters);
        }
    }

    pub fn interfaces(&self) -> impl Iterator<Item = (&str, &InterfaceShape)> {
        self.interfaces.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn classes(&self) -> impl Iterator<Item = (&str, &ClassShape)> {
        self.classes.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Invariant check: no name may be present on both sides
    pub fn names_disjoint(&self) -> bool {
        !self
            .interfaces
            .iter()
            .any(|(name, _)| self.classes.iter().any(|(n, _)| n == name))
    }
}
