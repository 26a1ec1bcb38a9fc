use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod type_ref;

pub use type_ref::TypeReference;

/// Key used for the single unnamed argument of an annotation, e.g. `@SuppressWarnings("x")`.
pub const DEFAULT_ANNOTATION_KEY: &str = "value";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Annotation,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Enum => "enum",
            TypeKind::Record => "record",
            TypeKind::Annotation => "annotation",
        }
    }

    /// Keyword used to declare this kind of type in source.
    pub fn keyword(&self) -> &'static str {
        match self {
            TypeKind::Annotation => "@interface",
            other => other.as_str(),
        }
    }
}

impl FromStr for TypeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(TypeKind::Class),
            "interface" => Ok(TypeKind::Interface),
            "enum" => Ok(TypeKind::Enum),
            "record" => Ok(TypeKind::Record),
            "annotation" => Ok(TypeKind::Annotation),
            _ => Err(format!("unknown type kind: {}", s)),
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Default,
    Synchronized,
    Native,
    Transient,
    Volatile,
    Strictfp,
    Sealed,
    #[serde(rename = "non-sealed")]
    NonSealed,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Abstract => "abstract",
            Modifier::Default => "default",
            Modifier::Synchronized => "synchronized",
            Modifier::Native => "native",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Strictfp => "strictfp",
            Modifier::Sealed => "sealed",
            Modifier::NonSealed => "non-sealed",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Modifier::Public),
            "protected" => Some(Modifier::Protected),
            "private" => Some(Modifier::Private),
            "static" => Some(Modifier::Static),
            "final" => Some(Modifier::Final),
            "abstract" => Some(Modifier::Abstract),
            "default" => Some(Modifier::Default),
            "synchronized" => Some(Modifier::Synchronized),
            "native" => Some(Modifier::Native),
            "transient" => Some(Modifier::Transient),
            "volatile" => Some(Modifier::Volatile),
            "strictfp" => Some(Modifier::Strictfp),
            "sealed" => Some(Modifier::Sealed),
            "non-sealed" => Some(Modifier::NonSealed),
            _ => None,
        }
    }
}

impl FromStr for Modifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modifier::from_keyword(s).ok_or_else(|| format!("unknown modifier: {}", s))
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn join_modifiers(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .map(Modifier::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Lexical or syntactic error reported by the analyzer.
    Syntax,
    /// Grammar production the extractor recognizes but does not model.
    Unsupported,
}

/// A recoverable problem recorded while extracting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 1-based line.
    pub line: usize,
    /// 0-based column.
    pub column: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}:{} - {}", self.line, self.column, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationArgument {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    /// Arguments in declaration order. Values are the literal source text.
    pub parameters: Vec<AnnotationArgument>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|p| p.name == key)
            .map(|p| p.value.as_str())
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|p| format!("{}={}", p.name, p.value))
                .collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: TypeReference,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub is_varargs: bool,
}

impl Parameter {
    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        if !self.modifiers.is_empty() {
            write!(f, "{} ", join_modifiers(&self.modifiers))?;
        }
        write!(f, "{} {}", self.type_ref, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_ref: TypeReference,
    pub modifiers: Vec<Modifier>,
    pub annotations: Vec<Annotation>,
    pub initializer: Option<String>,
    pub documentation: Option<String>,
    pub is_constant: bool,
    pub line: usize,
}

impl Field {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(&Modifier::Final)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    /// `void` sentinel for void methods and constructors.
    pub return_type: TypeReference,
    pub modifiers: Vec<Modifier>,
    pub parameters: Vec<Parameter>,
    pub throws: Vec<TypeReference>,
    pub annotations: Vec<Annotation>,
    pub type_parameters: Vec<String>,
    pub documentation: Option<String>,
    pub has_body: bool,
    pub is_constructor: bool,
    /// `default` clause of an annotation type element.
    pub default_value: Option<String>,
    pub line: usize,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeReference::void(),
            modifiers: Vec::new(),
            parameters: Vec::new(),
            throws: Vec::new(),
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            documentation: None,
            has_body: false,
            is_constructor: false,
            default_value: None,
            line: 0,
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&Modifier::Static)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(&Modifier::Abstract)
    }

    /// Render the declaration header, e.g. `@Override public <T> List<T> wrap(T item) throws IOException`.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = self.annotations.iter().map(|a| a.to_string()).collect();
        if !self.modifiers.is_empty() {
            parts.push(join_modifiers(&self.modifiers));
        }
        if !self.type_parameters.is_empty() {
            parts.push(format!("<{}>", self.type_parameters.join(", ")));
        }
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();
        if self.is_constructor {
            parts.push(format!("{}({})", self.name, params.join(", ")));
        } else {
            parts.push(format!(
                "{} {}({})",
                self.return_type,
                self.name,
                params.join(", ")
            ));
        }
        if !self.throws.is_empty() {
            let throws: Vec<String> = self.throws.iter().map(|t| t.to_string()).collect();
            parts.push(format!("throws {}", throws.join(", ")));
        }
        parts.join(" ")
    }
}

/// A class, interface, enum, record or annotation type declared in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub qualified_name: String,
    pub name: String,
    pub kind: TypeKind,
    pub modifiers: Vec<Modifier>,
    pub superclass: Option<TypeReference>,
    /// `implements` list, or `extends` list for interfaces.
    pub interfaces: Vec<TypeReference>,
    pub type_parameters: Vec<String>,
    pub nested_types: Vec<Type>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub annotations: Vec<Annotation>,
    pub documentation: Option<String>,
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub enum_constants: Vec<String>,
    pub record_components: Vec<Parameter>,
    pub has_parse_errors: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub file_path: String,
    pub line: usize,
}

impl Type {
    pub fn new(name: impl Into<String>, qualified_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            name: name.into(),
            kind,
            modifiers: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            nested_types: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            documentation: None,
            package: None,
            imports: Vec::new(),
            enum_constants: Vec::new(),
            record_components: Vec::new(),
            has_parse_errors: false,
            diagnostics: Vec::new(),
            file_path: String::new(),
            line: 0,
        }
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(&Modifier::Public)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_constructor)
    }

    pub fn public_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods
            .iter()
            .filter(|m| m.modifiers.contains(&Modifier::Public))
    }

    pub fn static_methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().filter(|m| m.is_static())
    }

    /// Fields whose declared type renders as `type_name` (e.g. `"List<String>"`).
    pub fn fields_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Field> {
        self.fields
            .iter()
            .filter(move |f| f.type_ref.to_string() == type_name)
    }

    /// Depth-first, pre-order iteration over this type and every nested type.
    pub fn walk(&self) -> TypeWalk<'_> {
        TypeWalk { stack: vec![self] }
    }

    pub fn find_nested(&self, qualified_name: &str) -> Option<&Type> {
        self.walk().find(|t| t.qualified_name == qualified_name)
    }
}

pub struct TypeWalk<'a> {
    stack: Vec<&'a Type>,
}

impl<'a> Iterator for TypeWalk<'a> {
    type Item = &'a Type;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.nested_types.iter().rev());
        Some(next)
    }
}
