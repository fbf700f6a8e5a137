use serde::{Deserialize, Serialize};

/// An inferred type tag for a Lua value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Type {
    /// Nothing could be inferred; renders as `unknown`
    Unknown,

    /// A function with no return statement
    Void,

    String,

    Number,

    Boolean,

    /// Multi-value return, e.g. `return "a", 1`
    Tuple(Vec<Type>),

    /// Homogeneous array, used for variadic capture (`unknown[]`)
    Array(Box<Type>),

    /// Opaque callable whose signature could not be inferred
    Function,

    /// Reference to a declared interface or class by name
    Named(String),
}

/// A single function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
    pub variadic: bool,
}

impl Parameter {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: Type::Unknown,
            variadic: false,
        }
    }

    pub fn vararg() -> Self {
        Self {
            name: "arg".to_string(),
            ty: Type::Array(Box::new(Type::Unknown)),
            variadic: true,
        }
    }
}

/// A named property on an interface shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub ty: Type,
}

/// How a member function is meant to be invoked in the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallConvention {
    /// `t:m()` — receiver passed implicitly
    Colon,
    /// `t.m()` — no implicit receiver
    Dot,
}

/// A method recorded on an interface shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub call: CallConvention,
}

/// A method recorded on a class shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Type,
    pub is_static: bool,
}

/// Table-as-interface shape: plain properties plus method signatures.
/// Names are unique within each list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterfaceShape {
    pub properties: Vec<Property>,
    pub methods: Vec<MethodSignature>,
}

impl InterfaceShape {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }
}

/// Table-as-class shape produced by promotion. Properties stay empty
/// after promotion; the interface's properties are reported through the
/// diagnostics channel instead of being carried over.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassShape {
    pub constructors: Vec<Vec<Parameter>>,
    pub methods: Vec<MethodDeclaration>,
    pub properties: Vec<Property>,
}

impl ClassShape {
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vararg_parameter_shape() {
        let param = Parameter::vararg();
        assert_eq!(param.name, "arg");
        assert_eq!(param.ty, Type::Array(Box::new(Type::Unknown)));
        assert!(param.variadic);
    }

    #[test]
    fn test_interface_shape_uniqueness_helpers() {
        let shape = InterfaceShape {
            properties: vec![Property {
                name: "x".to_string(),
                ty: Type::Number,
            }],
            methods: vec![MethodSignature {
                name: "getX".to_string(),
                parameters: vec![],
                return_type: Type::Number,
                call: CallConvention::Colon,
            }],
        };
        assert!(shape.has_property("x"));
        assert!(!shape.has_property("y"));
        assert!(shape.has_method("getX"));
        assert!(!shape.has_method("setX"));
    }
}
