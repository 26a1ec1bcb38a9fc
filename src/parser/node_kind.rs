use tree_sitter::Node;

use crate::model::TypeKind;

/// The grammar productions the structural extractor distinguishes.
///
/// Every tree-sitter node maps to exactly one variant, so the extractor's
/// enter/exit handlers are exhaustive matches over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,
    TypeDeclaration(TypeKind),
    MethodDeclaration,
    ConstructorDeclaration,
    CompactConstructorDeclaration,
    AnnotationElementDeclaration,
    FieldDeclaration,
    ConstantDeclaration,
    EnumConstant,
    /// `class_body`, `interface_body`, `enum_body`, `enum_body_declarations`, `annotation_type_body`.
    TypeBody,
    Modifiers,
    Annotation,
    FormalParameters,
    FormalParameter,
    SpreadParameter,
    ReceiverParameter,
    /// Statement blocks: method and constructor bodies, initializers.
    Block,
    Comment,
    Error,
    /// Anything else: identifiers, type nodes, clauses, keywords, punctuation.
    Other,
}

impl NodeKind {
    pub fn of(node: Node) -> Self {
        if node.is_error() {
            return NodeKind::Error;
        }
        match node.kind() {
            "program" => NodeKind::CompilationUnit,
            "package_declaration" => NodeKind::PackageDeclaration,
            "import_declaration" => NodeKind::ImportDeclaration,
            "class_declaration" => NodeKind::TypeDeclaration(TypeKind::Class),
            "interface_declaration" => NodeKind::TypeDeclaration(TypeKind::Interface),
            "enum_declaration" => NodeKind::TypeDeclaration(TypeKind::Enum),
            "record_declaration" => NodeKind::TypeDeclaration(TypeKind::Record),
            "annotation_type_declaration" => NodeKind::TypeDeclaration(TypeKind::Annotation),
            "method_declaration" => NodeKind::MethodDeclaration,
            "constructor_declaration" => NodeKind::ConstructorDeclaration,
            "compact_constructor_declaration" => NodeKind::CompactConstructorDeclaration,
            "annotation_type_element_declaration" => NodeKind::AnnotationElementDeclaration,
            "field_declaration" => NodeKind::FieldDeclaration,
            "constant_declaration" => NodeKind::ConstantDeclaration,
            "enum_constant" => NodeKind::EnumConstant,
            "class_body"
            | "interface_body"
            | "enum_body"
            | "enum_body_declarations"
            | "annotation_type_body" => NodeKind::TypeBody,
            "modifiers" => NodeKind::Modifiers,
            "annotation" | "marker_annotation" => NodeKind::Annotation,
            "formal_parameters" => NodeKind::FormalParameters,
            "formal_parameter" => NodeKind::FormalParameter,
            "spread_parameter" => NodeKind::SpreadParameter,
            "receiver_parameter" => NodeKind::ReceiverParameter,
            "block" | "constructor_body" | "static_initializer" => NodeKind::Block,
            "line_comment" | "block_comment" => NodeKind::Comment,
            _ => NodeKind::Other,
        }
    }

    /// Declarations that open a traversal frame.
    pub fn opens_frame(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeDeclaration(_)
                | NodeKind::MethodDeclaration
                | NodeKind::ConstructorDeclaration
                | NodeKind::CompactConstructorDeclaration
                | NodeKind::AnnotationElementDeclaration
        )
    }

    /// Containers whose direct children are declarations.
    pub fn is_declaration_scope(&self) -> bool {
        matches!(self, NodeKind::CompilationUnit | NodeKind::TypeBody)
    }
}
