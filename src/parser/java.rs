use tracing::debug;
use tree_sitter::Node;

use crate::model::{
    Annotation, AnnotationArgument, Field, Method, Modifier, Parameter, Type, TypeKind,
    TypeReference, DEFAULT_ANNOTATION_KEY,
};

use super::diagnostics::DiagnosticCollector;
use super::javadoc;
use super::node_kind::NodeKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Descend,
    Skip,
}

/// An entity whose subtree is still being visited.
enum Frame {
    Type(Type),
    Method(Method),
}

/// Everything extracted from one compilation unit.
#[derive(Debug, Default)]
pub struct ExtractedUnit {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub types: Vec<Type>,
}

/// Builds the structural model from enter/exit events over a Java CST.
///
/// Type and method declarations push a frame on enter and pop it on exit;
/// a popped type goes to the enclosing type's nested types, or to the
/// top-level result when no type encloses it. Fields, parameters,
/// annotations and enum constants are leaves attached to the current frame.
pub struct StructuralExtractor<'a> {
    source: &'a str,
    diagnostics: &'a mut DiagnosticCollector,
    frames: Vec<Frame>,
    unit: ExtractedUnit,
}

impl<'a> StructuralExtractor<'a> {
    pub fn new(source: &'a str, diagnostics: &'a mut DiagnosticCollector) -> Self {
        Self {
            source,
            diagnostics,
            frames: Vec::new(),
            unit: ExtractedUnit::default(),
        }
    }

    pub fn run(mut self, root: Node) -> ExtractedUnit {
        self.walk(root);
        self.unit
    }

    /// Pre-order traversal firing `exit` for every node whose `enter` descended.
    fn walk(&mut self, root: Node) {
        let mut cursor = root.walk();
        let mut path: Vec<NodeKind> = Vec::new();
        loop {
            let node = cursor.node();
            let kind = NodeKind::of(node);
            if self.enter(node, kind, &path) == Visit::Descend {
                if cursor.goto_first_child() {
                    path.push(kind);
                    continue;
                }
                self.exit(kind);
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
                if let Some(kind) = path.pop() {
                    self.exit(kind);
                }
            }
        }
    }

    fn enter(&mut self, node: Node, kind: NodeKind, path: &[NodeKind]) -> Visit {
        if !node.is_named() {
            return Visit::Skip;
        }
        match kind {
            NodeKind::CompilationUnit
            | NodeKind::TypeBody
            | NodeKind::Modifiers
            | NodeKind::FormalParameters
            | NodeKind::Error => Visit::Descend,
            NodeKind::PackageDeclaration => {
                self.enter_package(node);
                Visit::Skip
            }
            NodeKind::ImportDeclaration => {
                self.enter_import(node);
                Visit::Skip
            }
            NodeKind::TypeDeclaration(type_kind) => self.enter_type(node, type_kind),
            NodeKind::MethodDeclaration
            | NodeKind::ConstructorDeclaration
            | NodeKind::CompactConstructorDeclaration
            | NodeKind::AnnotationElementDeclaration => self.enter_method(node, kind),
            NodeKind::FieldDeclaration | NodeKind::ConstantDeclaration => {
                self.enter_field(node, kind);
                Visit::Skip
            }
            NodeKind::EnumConstant => {
                self.enter_enum_constant(node);
                Visit::Skip
            }
            NodeKind::Annotation => {
                if owned_by_frame(path, NodeKind::Modifiers) {
                    self.enter_annotation(node);
                }
                Visit::Skip
            }
            NodeKind::FormalParameter | NodeKind::SpreadParameter => {
                if owned_by_frame(path, NodeKind::FormalParameters) {
                    self.enter_parameter(node, kind);
                }
                Visit::Skip
            }
            NodeKind::ReceiverParameter | NodeKind::Block | NodeKind::Comment => Visit::Skip,
            NodeKind::Other => {
                let in_declaration_scope = path.last().is_some_and(|p| p.is_declaration_scope());
                if in_declaration_scope && !node.is_extra() && !node.is_missing() {
                    self.report_unsupported(node);
                }
                Visit::Skip
            }
        }
    }

    fn exit(&mut self, kind: NodeKind) {
        match kind {
            NodeKind::TypeDeclaration(_) => self.exit_type(),
            NodeKind::MethodDeclaration
            | NodeKind::ConstructorDeclaration
            | NodeKind::CompactConstructorDeclaration
            | NodeKind::AnnotationElementDeclaration => self.exit_method(),
            NodeKind::CompilationUnit
            | NodeKind::PackageDeclaration
            | NodeKind::ImportDeclaration
            | NodeKind::FieldDeclaration
            | NodeKind::ConstantDeclaration
            | NodeKind::EnumConstant
            | NodeKind::TypeBody
            | NodeKind::Modifiers
            | NodeKind::Annotation
            | NodeKind::FormalParameters
            | NodeKind::FormalParameter
            | NodeKind::SpreadParameter
            | NodeKind::ReceiverParameter
            | NodeKind::Block
            | NodeKind::Comment
            | NodeKind::Error
            | NodeKind::Other => {}
        }
    }

    fn text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn type_ref(&self, node: Node) -> TypeReference {
        TypeReference::parse(self.text(node))
    }

    fn nearest_type(&self) -> Option<&Type> {
        self.frames.iter().rev().find_map(|frame| match frame {
            Frame::Type(ty) => Some(ty),
            Frame::Method(_) => None,
        })
    }

    fn nearest_type_mut(&mut self) -> Option<&mut Type> {
        self.frames.iter_mut().rev().find_map(|frame| match frame {
            Frame::Type(ty) => Some(ty),
            Frame::Method(_) => None,
        })
    }

    fn qualified_name(&self, name: &str) -> String {
        if let Some(parent) = self.nearest_type() {
            return format!("{}.{}", parent.qualified_name, name);
        }
        match self.unit.package {
            Some(ref pkg) => format!("{}.{}", pkg, name),
            None => name.to_string(),
        }
    }

    fn report_unsupported(&mut self, node: Node) {
        let position = node.start_position();
        self.diagnostics.unsupported(
            position.row + 1,
            position.column,
            format!("unsupported construct '{}'", node.kind()),
        );
    }

    fn enter_package(&mut self, node: Node) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if matches!(child.kind(), "scoped_identifier" | "identifier") {
                self.unit.package = Some(strip_whitespace(self.text(child)));
            }
        }
    }

    fn enter_import(&mut self, node: Node) {
        let mut path = String::new();
        let mut is_static = false;
        let mut is_wildcard = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "scoped_identifier" | "identifier" => path = strip_whitespace(self.text(child)),
                "static" => is_static = true,
                "asterisk" => is_wildcard = true,
                _ => {}
            }
        }
        if path.is_empty() {
            return;
        }

        let mut import = String::new();
        if is_static {
            import.push_str("static ");
        }
        import.push_str(&path);
        if is_wildcard {
            import.push_str(".*");
        }
        self.unit.imports.push(import);
    }

    fn enter_type(&mut self, node: Node, kind: TypeKind) -> Visit {
        let name = match node.child_by_field_name("name") {
            Some(n) => self.text(n).to_string(),
            None => return Visit::Skip,
        };

        let qualified_name = self.qualified_name(&name);
        let mut ty = Type::new(name, qualified_name, kind);
        ty.package = self.unit.package.clone();
        ty.modifiers = modifiers_of(node);
        ty.type_parameters = self.type_parameters_of(node);
        ty.documentation = javadoc::preceding_doc(node, self.source);
        ty.line = line_of(node);

        match kind {
            TypeKind::Class => {
                ty.superclass = node
                    .child_by_field_name("superclass")
                    .and_then(first_non_extra_child)
                    .map(|t| self.type_ref(t));
                if let Some(interfaces) = node.child_by_field_name("interfaces") {
                    ty.interfaces = self.type_list(interfaces);
                }
            }
            TypeKind::Interface => {
                if let Some(extends) = child_of_kind(node, "extends_interfaces") {
                    ty.interfaces = self.type_list(extends);
                }
            }
            TypeKind::Enum | TypeKind::Record => {
                if let Some(interfaces) = node.child_by_field_name("interfaces") {
                    ty.interfaces = self.type_list(interfaces);
                }
            }
            TypeKind::Annotation => {}
        }

        debug!(name = %ty.qualified_name, kind = %kind, "enter type");
        self.frames.push(Frame::Type(ty));
        Visit::Descend
    }

    fn exit_type(&mut self) {
        let Some(Frame::Type(ty)) = self.frames.pop() else {
            return;
        };
        match self.nearest_type_mut() {
            Some(parent) => parent.nested_types.push(ty),
            None => self.unit.types.push(ty),
        }
    }

    fn enter_method(&mut self, node: Node, kind: NodeKind) -> Visit {
        let name = match node.child_by_field_name("name") {
            Some(n) => self.text(n).to_string(),
            None => return Visit::Skip,
        };

        let mut method = Method::new(name);
        method.modifiers = modifiers_of(node);
        method.type_parameters = self.type_parameters_of(node);
        method.documentation = javadoc::preceding_doc(node, self.source);
        method.has_body = node.child_by_field_name("body").is_some();
        method.line = line_of(node);

        match kind {
            NodeKind::ConstructorDeclaration | NodeKind::CompactConstructorDeclaration => {
                method.is_constructor = true;
            }
            _ => {
                if let Some(return_type) = node.child_by_field_name("type") {
                    // Legacy `int values()[]` form puts dimensions after the parameter list.
                    let dimensions = node
                        .child_by_field_name("dimensions")
                        .map(|d| count_dimensions(self.text(d)))
                        .unwrap_or(0);
                    method.return_type = self.type_ref(return_type).with_extra_dimensions(dimensions);
                }
            }
        }
        if kind == NodeKind::AnnotationElementDeclaration {
            method.default_value = node
                .child_by_field_name("value")
                .map(|v| self.text(v).to_string());
        }
        if let Some(throws) = child_of_kind(node, "throws") {
            let mut cursor = throws.walk();
            method.throws = throws
                .named_children(&mut cursor)
                .filter(|t| !t.is_extra())
                .map(|t| self.type_ref(t))
                .collect();
        }

        self.frames.push(Frame::Method(method));
        Visit::Descend
    }

    fn exit_method(&mut self) {
        let Some(Frame::Method(method)) = self.frames.pop() else {
            return;
        };
        match self.nearest_type_mut() {
            Some(ty) => ty.methods.push(method),
            None => debug!(name = %method.name, "dropping method outside of any type"),
        }
    }

    fn enter_field(&mut self, node: Node, kind: NodeKind) {
        let Some(enclosing_kind) = self.nearest_type().map(|t| t.kind) else {
            return;
        };
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };

        let base_type = self.type_ref(type_node);
        let modifiers = modifiers_of(node);
        let annotations = self.annotations_of(node);
        let documentation = javadoc::preceding_doc(node, self.source);
        // Interface and annotation-type fields are implicitly public static final.
        let is_constant = kind == NodeKind::ConstantDeclaration
            || matches!(enclosing_kind, TypeKind::Interface | TypeKind::Annotation)
            || (modifiers.contains(&Modifier::Static) && modifiers.contains(&Modifier::Final));

        let mut fields = Vec::new();
        let mut cursor = node.walk();
        for declarator in node.children_by_field_name("declarator", &mut cursor) {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let dimensions = declarator
                .child_by_field_name("dimensions")
                .map(|d| count_dimensions(self.text(d)))
                .unwrap_or(0);
            fields.push(Field {
                name: self.text(name_node).to_string(),
                type_ref: base_type.clone().with_extra_dimensions(dimensions),
                modifiers: modifiers.clone(),
                annotations: annotations.clone(),
                initializer: declarator
                    .child_by_field_name("value")
                    .map(|v| self.text(v).to_string()),
                documentation: documentation.clone(),
                is_constant,
                line: line_of(declarator),
            });
        }

        if let Some(ty) = self.nearest_type_mut() {
            ty.fields.extend(fields);
        }
    }

    fn enter_enum_constant(&mut self, node: Node) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(name_node).to_string();
        if let Some(Frame::Type(ty)) = self.frames.last_mut() {
            if ty.kind == TypeKind::Enum {
                ty.enum_constants.push(name);
            }
        }
    }

    fn enter_annotation(&mut self, node: Node) {
        let annotation = self.build_annotation(node);
        match self.frames.last_mut() {
            Some(Frame::Type(ty)) => ty.annotations.push(annotation),
            Some(Frame::Method(method)) => method.annotations.push(annotation),
            None => {}
        }
    }

    fn enter_parameter(&mut self, node: Node, kind: NodeKind) {
        let Some(parameter) = self.build_parameter(node, kind) else {
            return;
        };
        match self.frames.last_mut() {
            Some(Frame::Method(method)) => method.parameters.push(parameter),
            Some(Frame::Type(ty)) if ty.kind == TypeKind::Record => {
                ty.record_components.push(parameter)
            }
            _ => {}
        }
    }

    fn build_parameter(&self, node: Node, kind: NodeKind) -> Option<Parameter> {
        let (name, type_ref) = if kind == NodeKind::SpreadParameter {
            // `Type... name`: the type is the first child that is neither modifiers nor declarator.
            let mut cursor = node.walk();
            let type_node = node.named_children(&mut cursor).find(|c| {
                !c.is_extra()
                    && !matches!(
                        c.kind(),
                        "modifiers" | "variable_declarator" | "annotation" | "marker_annotation"
                    )
            })?;
            let declarator = child_of_kind(node, "variable_declarator")?;
            let name = self.text(declarator.child_by_field_name("name")?);
            (name, self.type_ref(type_node).into_varargs())
        } else {
            let name = self.text(node.child_by_field_name("name")?);
            let dimensions = node
                .child_by_field_name("dimensions")
                .map(|d| count_dimensions(self.text(d)))
                .unwrap_or(0);
            let type_ref = self
                .type_ref(node.child_by_field_name("type")?)
                .with_extra_dimensions(dimensions);
            (name, type_ref)
        };

        Some(Parameter {
            name: name.to_string(),
            is_varargs: type_ref.is_varargs,
            type_ref,
            modifiers: modifiers_of(node),
            annotations: self.annotations_of(node),
        })
    }

    fn build_annotation(&self, node: Node) -> Annotation {
        let name = node
            .child_by_field_name("name")
            .map(|n| strip_whitespace(self.text(n)))
            .unwrap_or_default();
        let mut annotation = Annotation::new(name);

        if let Some(arguments) = node.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            for argument in arguments.named_children(&mut cursor) {
                if argument.is_extra() {
                    continue;
                }
                if argument.kind() == "element_value_pair" {
                    let key = argument.child_by_field_name("key");
                    let value = argument.child_by_field_name("value");
                    if let (Some(key), Some(value)) = (key, value) {
                        annotation.parameters.push(AnnotationArgument {
                            name: self.text(key).to_string(),
                            value: self.text(value).to_string(),
                        });
                    }
                } else {
                    annotation.parameters.push(AnnotationArgument {
                        name: DEFAULT_ANNOTATION_KEY.to_string(),
                        value: self.text(argument).to_string(),
                    });
                }
            }
        }
        annotation
    }

    /// Annotations in a declaration's own `modifiers`, for leaf entities whose
    /// subtree is not walked.
    fn annotations_of(&self, node: Node) -> Vec<Annotation> {
        let Some(modifiers) = child_of_kind(node, "modifiers") else {
            return Vec::new();
        };
        let mut cursor = modifiers.walk();
        let annotations = modifiers
            .named_children(&mut cursor)
            .filter(|c| NodeKind::of(*c) == NodeKind::Annotation)
            .map(|c| self.build_annotation(c))
            .collect();
        annotations
    }

    fn type_parameters_of(&self, node: Node) -> Vec<String> {
        let Some(type_params) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        let mut names = Vec::new();
        let mut cursor = type_params.walk();
        for param in type_params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let mut inner_cursor = param.walk();
            let name = param
                .named_children(&mut inner_cursor)
                .find(|c| matches!(c.kind(), "type_identifier" | "identifier"));
            if let Some(name) = name {
                names.push(self.text(name).to_string());
            }
        }
        names
    }

    /// Types in a `super_interfaces` / `extends_interfaces` clause.
    fn type_list(&self, clause: Node) -> Vec<TypeReference> {
        let Some(list) = child_of_kind(clause, "type_list") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        let types = list
            .named_children(&mut cursor)
            .filter(|t| !t.is_extra())
            .map(|t| self.type_ref(t))
            .collect();
        types
    }
}

/// Whether the node sits directly in `container` (e.g. `modifiers`) of the
/// declaration that owns the current frame.
fn owned_by_frame(path: &[NodeKind], container: NodeKind) -> bool {
    match path {
        [.., owner, last] => *last == container && owner.opens_frame(),
        _ => false,
    }
}

fn modifiers_of(node: Node) -> Vec<Modifier> {
    let Some(modifiers) = child_of_kind(node, "modifiers") else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    let keywords = modifiers
        .children(&mut cursor)
        .filter_map(|c| Modifier::from_keyword(c.kind()))
        .collect();
    keywords
}

fn first_non_extra_child(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| !c.is_extra());
    found
}

fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn count_dimensions(text: &str) -> usize {
    text.matches('[').count()
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
