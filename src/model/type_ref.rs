use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized mention of a type in source: `Map<String, List<Integer>>[]`, `String...`.
///
/// Wildcards use the name `?`. A bounded wildcard is named `? extends` or
/// `? super` and carries its bound as its only type argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeReference {
    pub name: String,
    pub type_arguments: Vec<TypeReference>,
    pub array_dimensions: usize,
    pub is_varargs: bool,
}

impl TypeReference {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
            array_dimensions: 0,
            is_varargs: false,
        }
    }

    pub fn void() -> Self {
        Self::simple("void")
    }

    pub fn is_void(&self) -> bool {
        self.name == "void" && self.array_dimensions == 0
    }

    /// Last segment of a qualified name: `java.util.List` -> `List`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn with_extra_dimensions(mut self, dimensions: usize) -> Self {
        self.array_dimensions += dimensions;
        self
    }

    pub fn into_varargs(mut self) -> Self {
        self.is_varargs = true;
        self
    }

    /// Normalize the source text of a type mention.
    ///
    /// Whitespace and type annotations are dropped, generic arguments are
    /// normalized recursively, trailing `[]` pairs are counted and a trailing
    /// `...` marks varargs. Text that does not look like a type at all is kept
    /// verbatim (minus whitespace) as the name.
    pub fn parse(text: &str) -> Self {
        let mut cursor = Cursor::new(text);
        let parsed = parse_type(&mut cursor);
        if parsed.name.is_empty() {
            let raw: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            return Self::simple(raw);
        }
        parsed
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.starts_with('?') && !self.type_arguments.is_empty() {
            write!(f, "{} {}", self.name, self.type_arguments[0])?;
        } else {
            write!(f, "{}", self.name)?;
            if !self.type_arguments.is_empty() {
                let args: Vec<String> = self.type_arguments.iter().map(|a| a.to_string()).collect();
                write!(f, "<{}>", args.join(", "))?;
            }
        }
        for _ in 0..self.array_dimensions {
            write!(f, "[]")?;
        }
        if self.is_varargs {
            write!(f, "...")?;
        }
        Ok(())
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        self.skip_whitespace();
        let rest = self.rest();
        if rest.starts_with(keyword)
            && !rest[keyword.len()..]
                .chars()
                .next()
                .is_some_and(is_identifier_char)
        {
            self.pos += keyword.len();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> &'a str {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    /// Skip `@Name` and `@Name(...)` type annotations.
    fn skip_annotations(&mut self) {
        loop {
            self.skip_whitespace();
            if self.peek() != Some('@') {
                return;
            }
            self.bump();
            loop {
                self.identifier();
                if self.rest().starts_with('.') && !self.rest().starts_with("...") {
                    self.bump();
                } else {
                    break;
                }
            }
            self.skip_whitespace();
            if self.peek() == Some('(') {
                self.skip_balanced_parens();
            }
        }
    }

    fn skip_balanced_parens(&mut self) {
        let mut depth = 0usize;
        while let Some(c) = self.bump() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn parse_type(cursor: &mut Cursor<'_>) -> TypeReference {
    cursor.skip_annotations();
    if cursor.eat('?') {
        let bound = if cursor.eat_keyword("extends") {
            Some("? extends")
        } else if cursor.eat_keyword("super") {
            Some("? super")
        } else {
            None
        };
        let mut wildcard = match bound {
            Some(name) => TypeReference {
                name: name.to_string(),
                type_arguments: vec![parse_type(cursor)],
                array_dimensions: 0,
                is_varargs: false,
            },
            None => TypeReference::simple("?"),
        };
        wildcard.array_dimensions = parse_dimensions(cursor);
        return wildcard;
    }

    let mut name = String::new();
    let mut type_arguments = Vec::new();
    loop {
        cursor.skip_annotations();
        let segment = cursor.identifier();
        if segment.is_empty() {
            break;
        }
        name.push_str(segment);
        // `Outer<A>.Inner<B>` keeps the innermost arguments.
        if cursor.eat('<') {
            type_arguments = parse_type_arguments(cursor);
        }
        cursor.skip_whitespace();
        if cursor.rest().starts_with('.') && !cursor.rest().starts_with("...") {
            cursor.bump();
            name.push('.');
        } else {
            break;
        }
    }
    if name.ends_with('.') {
        name.pop();
    }

    let array_dimensions = parse_dimensions(cursor);
    cursor.skip_whitespace();
    let is_varargs = cursor.rest().starts_with("...");
    if is_varargs {
        cursor.pos += 3;
    }

    TypeReference {
        name,
        type_arguments,
        array_dimensions,
        is_varargs,
    }
}

/// Parse a comma-separated argument list after its opening `<`, consuming the closing `>`.
fn parse_type_arguments(cursor: &mut Cursor<'_>) -> Vec<TypeReference> {
    let mut arguments = Vec::new();
    loop {
        if cursor.eat('>') {
            break;
        }
        if cursor.peek().is_none() {
            break;
        }
        let argument = parse_type(cursor);
        if !argument.name.is_empty() {
            arguments.push(argument);
        }
        cursor.skip_whitespace();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
            }
            Some('>') => {
                cursor.bump();
                break;
            }
            None => break,
            Some(_) => {
                cursor.bump();
            }
        }
    }
    arguments
}

fn parse_dimensions(cursor: &mut Cursor<'_>) -> usize {
    let mut dimensions = 0;
    loop {
        cursor.skip_annotations();
        if cursor.eat('[') {
            cursor.eat(']');
            dimensions += 1;
        } else {
            return dimensions;
        }
    }
}
