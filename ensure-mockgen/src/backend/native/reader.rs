//! Reads interface declarations out of Go source files.
//!
//! Sources are parsed with Tree-sitter. Only top-level declarations are
//! looked at: the package clause, imports and `type` declarations. Parameter
//! and result types are kept as source text, with the identifiers that need
//! a package qualifier in the mock marked so they can be resolved once every
//! file of the package has been read.

use std::collections::{BTreeMap, BTreeSet};

use tree_sitter::{Language, Node, Parser, Query, QueryCursor, StreamingIterator};

use crate::BackendError;

/// Import paths referenced by a mock, with the name to import them as when
/// it differs from the default.
pub(crate) type Imports = BTreeMap<String, Option<String>>;

/// Parses Go sources into [`SourceFile`]s.
pub(crate) struct GoReader {
    language: Language,
    /// Top-level declarations only; nested types are never mocked.
    query: Query,
}

impl GoReader {
    pub fn new() -> Result<Self, BackendError> {
        let language = tree_sitter_go::LANGUAGE.into();
        let query_src = r#"
            (source_file (package_clause) @package)
            (source_file (import_declaration) @import)
            (source_file (type_declaration) @types)
        "#;

        let query = Query::new(&language, query_src)
            .map_err(|err| BackendError::Parser(format!("invalid Go query: {err}")))?;
        Ok(Self { language, query })
    }

    pub fn parse(&self, src: &str) -> Result<SourceFile, BackendError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|err| BackendError::Parser(err.to_string()))?;

        let tree = parser
            .parse(src, None)
            .ok_or_else(|| BackendError::Parser("failed to parse Go source".to_string()))?;

        let mut file = SourceFile::default();
        let cap_names = self.query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, tree.root_node(), src.as_bytes());

        while let Some(m) = matches.next() {
            for cap in m.captures {
                let node = cap.node;
                match cap_names[cap.index as usize] {
                    "package" => {
                        let mut walk = node.walk();
                        if let Some(name) = node.named_children(&mut walk).next() {
                            file.package = text(name, src).to_string();
                        }
                    }
                    "import" => collect_imports(node, src, &mut file.imports),
                    "types" => collect_types(node, src, &mut file.types),
                    _ => {}
                }
            }
        }

        Ok(file)
    }
}

/// A parsed Go source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SourceFile {
    /// Name from the package clause.
    pub package: String,
    pub imports: Vec<Import>,
    types: Vec<TypeDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Import {
    /// Explicit import name, including `.` and `_`.
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    /// The identifier the import is referenced by, or `None` for dot and
    /// blank imports.
    pub fn name(&self) -> Option<String> {
        match self.alias.as_deref() {
            Some("." | "_") => None,
            Some(alias) => Some(alias.to_string()),
            None => Some(default_import_name(&self.path)),
        }
    }

    fn is_dot(&self) -> bool {
        self.alias.as_deref() == Some(".")
    }
}

/// Name a package is referenced by when imported without an explicit name.
pub(crate) fn default_import_name(path: &str) -> String {
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or_default();
    let base = if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    };

    let base = base.split('.').next().unwrap_or(base);
    let base = base.strip_prefix("go-").unwrap_or(base);
    base.replace('-', "_")
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// The explicit import name needed for `path` to be referenced as `name`.
pub(crate) fn alias(name: &str, path: &str) -> Option<String> {
    (default_import_name(path) != name).then(|| name.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Interface<T = String> {
    pub name: String,
    /// Methods sorted by name.
    pub methods: Vec<Method<T>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Method<T = String> {
    pub name: String,
    pub params: Vec<Param<T>>,
    pub results: Vec<Param<T>>,
    /// Whether the last parameter is variadic. Its type omits the `...`.
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Param<T = String> {
    pub name: Option<String>,
    pub ty: T,
}

/// Type text with the identifiers that need qualifying marked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TypeExpr {
    parts: Vec<TypePart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypePart {
    Text(String),
    /// Exported identifier without a package qualifier.
    Local(String),
    /// `package.Name`.
    Imported { package: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeDecl {
    name: String,
    /// The interface, or why it cannot be mocked.
    body: Result<Interface<TypeExpr>, String>,
}

/// Outcome of looking an interface up in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Lookup<'a> {
    Found(&'a Interface<TypeExpr>),
    Unsupported(String),
    Missing,
}

/// What the package being mocked declares, across all of its files.
#[derive(Debug, Clone)]
pub(crate) struct Scope<'a> {
    /// Name the source package is referenced by in the mock.
    pub package_name: &'a str,
    pub package_path: &'a str,
    /// Types declared at the top level of the package.
    pub declared: &'a BTreeSet<String>,
}

impl SourceFile {
    /// Look up the interface declared as `name`.
    pub fn find_interface(&self, name: &str) -> Lookup<'_> {
        match self.types.iter().find(|decl| decl.name == name) {
            Some(TypeDecl { body: Ok(iface), .. }) => Lookup::Found(iface),
            Some(TypeDecl {
                body: Err(reason), ..
            }) => Lookup::Unsupported(reason.clone()),
            None => Lookup::Missing,
        }
    }

    /// Names of the types declared at the top level of this file.
    pub fn declared_types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(|decl| decl.name.as_str())
    }

    /// Qualify the types of `iface` for use outside its package, adding the
    /// imports they need to `imports`.
    pub fn resolve(
        &self,
        iface: &Interface<TypeExpr>,
        scope: &Scope<'_>,
        imports: &mut Imports,
    ) -> Result<Interface, String> {
        let mut methods = Vec::with_capacity(iface.methods.len());
        for method in &iface.methods {
            methods.push(Method {
                name: method.name.clone(),
                params: self.resolve_params(&method.params, scope, imports)?,
                results: self.resolve_params(&method.results, scope, imports)?,
                variadic: method.variadic,
            });
        }

        Ok(Interface {
            name: iface.name.clone(),
            methods,
        })
    }

    fn resolve_params(
        &self,
        params: &[Param<TypeExpr>],
        scope: &Scope<'_>,
        imports: &mut Imports,
    ) -> Result<Vec<Param>, String> {
        let mut resolved = Vec::with_capacity(params.len());
        for param in params {
            resolved.push(Param {
                name: param.name.clone(),
                ty: self.resolve_type(&param.ty, scope, imports)?,
            });
        }
        Ok(resolved)
    }

    fn resolve_type(
        &self,
        ty: &TypeExpr,
        scope: &Scope<'_>,
        imports: &mut Imports,
    ) -> Result<String, String> {
        let mut out = String::new();
        for part in &ty.parts {
            match part {
                TypePart::Text(text) => out.push_str(text),
                TypePart::Local(name) => {
                    let qualifier = self.local_qualifier(name, scope, imports)?;
                    out.push_str(&format!("{qualifier}.{name}"));
                }
                TypePart::Imported { package, name } => {
                    let import = self
                        .imports
                        .iter()
                        .find(|import| import.name().as_deref() == Some(package))
                        .ok_or_else(|| format!("no import provides package `{package}`"))?;
                    imports.insert(import.path.clone(), alias(package, &import.path));
                    out.push_str(&format!("{package}.{name}"));
                }
            }
        }
        Ok(normalize_type(&out))
    }

    /// Package an unqualified exported identifier belongs to.
    ///
    /// Types declared by the package win over dot imports.
    fn local_qualifier(
        &self,
        name: &str,
        scope: &Scope<'_>,
        imports: &mut Imports,
    ) -> Result<String, String> {
        let dot_imports: Vec<&Import> = self.imports.iter().filter(|i| i.is_dot()).collect();

        match dot_imports.as_slice() {
            [import] if !scope.declared.contains(name) => {
                let qualifier = default_import_name(&import.path);
                imports.insert(import.path.clone(), None);
                Ok(qualifier)
            }
            [_, _, ..] if !scope.declared.contains(name) => Err(format!(
                "cannot tell which dot import declares `{name}`"
            )),
            _ => {
                imports.insert(
                    scope.package_path.to_string(),
                    alias(scope.package_name, scope.package_path),
                );
                Ok(scope.package_name.to_string())
            }
        }
    }
}

fn collect_imports(node: Node, src: &str, out: &mut Vec<Import>) {
    let mut walk = node.walk();
    for child in node.named_children(&mut walk) {
        match child.kind() {
            "import_spec" => out.extend(import_spec(child, src)),
            "import_spec_list" => collect_imports(child, src, out),
            _ => {}
        }
    }
}

fn import_spec(node: Node, src: &str) -> Option<Import> {
    let path = node.child_by_field_name("path")?;
    let path = text(path, src).trim_matches(|c| c == '"' || c == '`');
    if path.is_empty() {
        return None;
    }

    Some(Import {
        alias: node
            .child_by_field_name("name")
            .map(|name| text(name, src).to_string()),
        path: path.to_string(),
    })
}

fn collect_types(node: Node, src: &str, out: &mut Vec<TypeDecl>) {
    let mut walk = node.walk();
    for spec in node.named_children(&mut walk) {
        let Some(name) = spec.child_by_field_name("name") else {
            continue;
        };

        let body = match spec.kind() {
            "type_alias" => Err("type aliases are not supported".to_string()),
            _ => type_spec_body(spec, src),
        };
        out.push(TypeDecl {
            name: text(name, src).to_string(),
            body,
        });
    }
}

fn type_spec_body(spec: Node, src: &str) -> Result<Interface<TypeExpr>, String> {
    let ty = spec
        .child_by_field_name("type")
        .ok_or_else(|| "missing type".to_string())?;
    if ty.kind() != "interface_type" {
        return Err("not an interface".to_string());
    }
    if spec.child_by_field_name("type_parameters").is_some() {
        return Err("type parameters are not supported".to_string());
    }
    if spec.has_error() {
        return Err("syntax error in declaration".to_string());
    }

    let mut methods = Vec::new();
    let mut walk = ty.walk();
    for element in ty.named_children(&mut walk) {
        match element.kind() {
            "method_elem" => methods.push(method(element, src)?),
            "comment" => {}
            _ => {
                return Err(format!(
                    "embedded interfaces and type constraints are not supported (found `{}`)",
                    normalize_type(text(element, src))
                ));
            }
        }
    }

    methods.sort_by(|a, b| a.name.cmp(&b.name));
    let name = spec
        .child_by_field_name("name")
        .map(|name| text(name, src).to_string())
        .unwrap_or_default();
    Ok(Interface { name, methods })
}

fn method(node: Node, src: &str) -> Result<Method<TypeExpr>, String> {
    let name = node
        .child_by_field_name("name")
        .map(|name| text(name, src).to_string())
        .ok_or_else(|| "method without a name".to_string())?;
    let (params, variadic) = node
        .child_by_field_name("parameters")
        .map(|list| parameters(list, src))
        .ok_or_else(|| format!("missing parameters for {name}"))?;

    let results = match node.child_by_field_name("result") {
        Some(list) if list.kind() == "parameter_list" => parameters(list, src).0,
        Some(ty) => vec![Param {
            name: None,
            ty: type_expr(ty, src),
        }],
        None => Vec::new(),
    };

    Ok(Method {
        name,
        params,
        results,
        variadic,
    })
}

/// Parameters of a list, expanding grouped names (`a, b int`), and whether
/// the last one is variadic.
fn parameters(list: Node, src: &str) -> (Vec<Param<TypeExpr>>, bool) {
    let mut params = Vec::new();
    let mut variadic = false;

    let mut walk = list.walk();
    for decl in list.named_children(&mut walk) {
        let Some(ty) = decl.child_by_field_name("type") else {
            continue;
        };
        let ty = type_expr(ty, src);
        variadic = decl.kind() == "variadic_parameter_declaration";

        let mut names_walk = decl.walk();
        let names: Vec<String> = decl
            .children_by_field_name("name", &mut names_walk)
            .map(|name| text(name, src).to_string())
            .collect();

        if names.is_empty() {
            params.push(Param { name: None, ty });
        } else {
            params.extend(names.into_iter().map(|name| Param {
                name: Some(name),
                ty: ty.clone(),
            }));
        }
    }

    (params, variadic)
}

fn type_expr(node: Node, src: &str) -> TypeExpr {
    let mut expr = TypeExpr::default();
    let mut pos = node.start_byte();
    collect_type_parts(node, src, &mut pos, &mut expr.parts);
    push_text(&mut expr.parts, slice(src, pos, node.end_byte()));
    expr
}

fn collect_type_parts(node: Node, src: &str, pos: &mut usize, parts: &mut Vec<TypePart>) {
    let part = match node.kind() {
        "comment" => None,
        "qualified_type" => {
            let package = node.child_by_field_name("package");
            let name = node.child_by_field_name("name");
            match (package, name) {
                (Some(package), Some(name)) => Some(TypePart::Imported {
                    package: text(package, src).to_string(),
                    name: text(name, src).to_string(),
                }),
                _ => Some(TypePart::Text(text(node, src).to_string())),
            }
        }
        "type_identifier" if text(node, src).starts_with(char::is_uppercase) => {
            Some(TypePart::Local(text(node, src).to_string()))
        }
        _ => {
            let mut walk = node.walk();
            for child in node.children(&mut walk) {
                collect_type_parts(child, src, pos, parts);
            }
            return;
        }
    };

    push_text(parts, slice(src, *pos, node.start_byte()));
    parts.extend(part);
    *pos = node.end_byte();
}

fn push_text(parts: &mut Vec<TypePart>, text: &str) {
    if !text.is_empty() {
        parts.push(TypePart::Text(text.to_string()));
    }
}

/// Collapse whitespace, including line breaks left by multi-line lists.
fn normalize_type(ty: &str) -> String {
    ty.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(",)", ")")
}

fn text<'a>(node: Node, src: &'a str) -> &'a str {
    slice(src, node.start_byte(), node.end_byte())
}

fn slice(src: &str, start: usize, end: usize) -> &str {
    src.get(start..end).unwrap_or_default()
}
