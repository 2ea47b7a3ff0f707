//! Language-neutral model of the code a markup document compiles to.
//!
//! The sub-builders share the work of collecting designer fields and
//! expression bodies, resolving member-access chains against the type index
//! and locating the call under the caret. Only rendering and keywords differ
//! per language.

use tower_lsp::lsp_types::{
    ParameterInformation, ParameterLabel, SignatureHelp, SignatureInformation,
};
use tracing::{debug, trace};

use crate::lsp::features::code_behind::{designer_fields, DesignerField};
use crate::lsp::features::completion::entry::{CompletionEntry, EntryKind};
use crate::lsp::features::completion::resolver::ControlResolver;
use crate::markup::node::{ExpressionKind, TextPosition};
use crate::markup::page_info::PageInfo;
use crate::lsp::document::DocumentSnapshot;
use crate::type_system::{Accessibility, MethodDefinition, TypeDefinition, TypeIndex, TypeSystem};

/// Namespaces every generated page class imports.
pub const DEFAULT_IMPORTS: &[&str] = &[
    "System",
    "System.Collections",
    "System.Web",
    "System.Web.UI",
    "System.Web.UI.WebControls",
    "System.Web.UI.HtmlControls",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionBody {
    pub kind: ExpressionKind,
    pub text: String,
    pub start: TextPosition,
}

/// The virtual code document built for one markup snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltDocument {
    pub language: String,
    /// Name of the generated class.
    pub class_name: String,
    /// `Inherits` class, or the document kind's framework base.
    pub base_class: String,
    pub imports: Vec<String>,
    pub fields: Vec<DesignerField>,
    pub expressions: Vec<ExpressionBody>,
    /// Rendered source of the generated class.
    pub text: String,
}

impl BuiltDocument {
    /// Collects everything but the rendered text.
    pub fn collect(language: &str, page_info: &PageInfo, snapshot: &DocumentSnapshot, types: &TypeSystem) -> Self {
        let resolver = ControlResolver::new(types, &snapshot.registrations);
        let fields = designer_fields(&snapshot.root, &resolver);

        let mut imports: Vec<String> = DEFAULT_IMPORTS.iter().map(|s| s.to_string()).collect();
        let mut expressions = Vec::new();
        snapshot.root.walk(&mut |node| {
            if let Some(directive) = node.as_directive() {
                if directive.name.eq_ignore_ascii_case("Import") {
                    if let Some(namespace) = directive.attributes.get("Namespace").map(str::trim) {
                        if !imports.iter().any(|i| i == namespace) {
                            imports.push(namespace.to_string());
                        }
                    }
                }
            }
            if let Some(expression) = node.as_expression() {
                expressions.push(ExpressionBody {
                    kind: expression.kind,
                    text: expression.text.clone(),
                    start: expression.text_start,
                });
            }
        });

        let stem = snapshot
            .uri
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or("Document");
        let class_name: String = stem
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();

        Self {
            language: language.to_string(),
            class_name,
            base_class: page_info
                .inherits
                .clone()
                .unwrap_or_else(|| page_info.kind.base_type().to_string()),
            imports,
            fields,
            expressions,
            text: String::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&DesignerField> {
        self.fields.iter().find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Code of the expression under the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDocument {
    pub kind: ExpressionKind,
    pub code: String,
    /// Byte offset of the caret in `code`.
    pub caret: usize,
}

impl LocalDocument {
    pub fn new(kind: ExpressionKind, source_text: &str, text_after_caret: &str) -> Self {
        // the expression ends at the next `%>`
        let after = text_after_caret.split("%>").next().unwrap_or_default();
        Self {
            kind,
            code: format!("{}{}", source_text, after),
            caret: source_text.len(),
        }
    }

    pub fn before_caret(&self) -> &str {
        &self.code[..self.caret]
    }
}

/// Per-language lexical facts used by the shared resolution code.
#[derive(Debug, Clone, Copy)]
pub struct Syntax {
    pub self_keyword: &'static str,
    pub keywords: &'static [&'static str],
    /// Language keyword spellings of framework types.
    pub type_aliases: &'static [(&'static str, &'static str)],
}

impl Syntax {
    /// Framework name of a type written with a language keyword.
    pub fn framework_name<'a>(&self, name: &'a str) -> &'a str {
        self.type_aliases
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
            .map(|(_, full)| *full)
            .unwrap_or(name)
    }

    /// Language spelling of a framework type, for rendering.
    pub fn type_display<'a>(&self, full_name: &'a str) -> &'a str {
        self.type_aliases
            .iter()
            .find(|(_, full)| full.eq_ignore_ascii_case(full_name))
            .map(|(alias, _)| *alias)
            .unwrap_or(full_name)
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// One step of a member-access chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSegment {
    pub name: String,
    pub invoked: bool,
}

/// Splits the text before the caret into a member-access chain and the
/// partial identifier being typed.
///
/// `Foo.Bar().Ba` yields `[Foo, Bar()]` and `Ba`. Without a trailing dot the
/// chain is empty.
pub fn member_access(before: &str) -> (Vec<ChainSegment>, String) {
    let partial_start = before
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(before.len());
    let partial = before[partial_start..].to_string();
    let mut rest = &before[..partial_start];

    let mut chain = Vec::new();
    while let Some(stripped) = rest.strip_suffix('.') {
        rest = stripped;
        let mut invoked = false;
        if rest.ends_with(')') {
            let Some(open) = matching_open_paren(rest) else {
                break;
            };
            rest = &rest[..open];
            invoked = true;
        }
        let start = rest
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_identifier_char(*c))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let name = &rest[start..];
        if name.is_empty() {
            break;
        }
        chain.push(ChainSegment { name: name.to_string(), invoked });
        rest = &rest[..start];
    }
    chain.reverse();
    (chain, partial)
}

/// Byte index of the `(` matching the `)` that ends `text`.
fn matching_open_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The innermost unclosed call before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub target: Vec<ChainSegment>,
    pub method: String,
    pub active_parameter: u32,
}

pub fn call_site(before: &str) -> Option<CallSite> {
    let mut depth = 0usize;
    let mut commas = 0u32;
    let mut in_string = false;
    for (i, c) in before.char_indices().rev() {
        if c == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        match c {
            ')' => depth += 1,
            '(' if depth == 0 => {
                let (target, method) = member_access(&before[..i]);
                if method.is_empty() {
                    return None;
                }
                return Some(CallSite { target, method, active_parameter: commas });
            }
            '(' => depth -= 1,
            ',' if depth == 0 => commas += 1,
            _ => {}
        }
    }
    None
}

/// Resolves member chains against the code-behind class and the type index.
pub struct MemberResolver<'a> {
    pub index: &'a dyn TypeIndex,
    pub document: &'a BuiltDocument,
    pub syntax: &'a Syntax,
}

impl<'a> MemberResolver<'a> {
    fn this_type(&self) -> Option<&'a TypeDefinition> {
        self.index.type_by_full_name(&self.document.base_class)
    }

    /// `ty` and its bases, nearest first.
    fn hierarchy(&self, ty: &'a TypeDefinition) -> Vec<&'a TypeDefinition> {
        std::iter::once(ty).chain(self.index.base_types(ty)).collect()
    }

    /// A type named in source: full name, alias, or a name under an import.
    fn type_named(&self, name: &str) -> Option<&'a TypeDefinition> {
        let name = self.syntax.framework_name(name);
        self.index.type_by_full_name(name).or_else(|| {
            self.document
                .imports
                .iter()
                .find_map(|namespace| self.index.type_definition(namespace, name))
        })
    }

    /// Declared type of `member` on `ty` or its bases.
    fn member_type(&self, ty: &'a TypeDefinition, segment: &ChainSegment) -> Option<&'a TypeDefinition> {
        let name = segment.name.as_str();
        for declaring in self.hierarchy(ty) {
            let type_name = if segment.invoked {
                declaring
                    .methods
                    .iter()
                    .find(|m| m.name.eq_ignore_ascii_case(name))
                    .map(|m| m.return_type.as_str())
            } else {
                declaring
                    .properties
                    .iter()
                    .find(|p| p.name.eq_ignore_ascii_case(name))
                    .map(|p| p.type_name.as_str())
                    .or_else(|| {
                        declaring
                            .fields
                            .iter()
                            .find(|f| f.name.eq_ignore_ascii_case(name))
                            .map(|f| f.type_name.as_str())
                    })
            };
            if let Some(type_name) = type_name {
                return self.index.type_by_full_name(type_name);
            }
        }
        None
    }

    /// Type of the first chain segment, looked up in scope.
    fn root_type(&self, segment: &ChainSegment) -> Option<&'a TypeDefinition> {
        if segment.name.eq_ignore_ascii_case(self.syntax.self_keyword) {
            return self.this_type();
        }
        if let Some(field) = self.document.field(&segment.name) {
            return self.index.type_by_full_name(&field.type_name);
        }
        if let Some(this) = self.this_type() {
            if let Some(ty) = self.member_type(this, segment) {
                return Some(ty);
            }
        }
        self.type_named(&segment.name)
    }

    /// Type a whole chain evaluates to.
    pub fn resolve_chain(&self, chain: &[ChainSegment]) -> Option<&'a TypeDefinition> {
        let (first, rest) = chain.split_first()?;
        let mut current = self.root_type(first)?;
        for segment in rest {
            current = self.member_type(current, segment)?;
        }
        trace!("Chain {:?} resolved to {}", chain, current.full_name());
        Some(current)
    }

    /// Members of `ty` visible from the page class, one entry per name.
    pub fn member_entries(&self, ty: &'a TypeDefinition, include_protected: bool) -> Vec<CompletionEntry> {
        let visible = |accessibility: Accessibility| {
            accessibility == Accessibility::Public || (include_protected && accessibility.is_inheritable())
        };
        let mut entries: Vec<CompletionEntry> = Vec::new();
        let push = |entries: &mut Vec<CompletionEntry>, entry: CompletionEntry| {
            if !entries.iter().any(|e| e.label.eq_ignore_ascii_case(&entry.label)) {
                entries.push(entry);
            }
        };

        for declaring in self.hierarchy(ty) {
            for property in declaring.properties.iter().filter(|p| visible(p.accessibility)) {
                push(
                    &mut entries,
                    CompletionEntry::new(property.name.clone(), EntryKind::Property)
                        .with_detail(self.syntax.type_display(&property.type_name).to_string())
                        .with_documentation(property.documentation.clone()),
                );
            }
            for method in declaring.methods.iter().filter(|m| visible(m.accessibility)) {
                push(
                    &mut entries,
                    CompletionEntry::new(method.name.clone(), EntryKind::Method)
                        .with_detail(self.render_signature(method))
                        .with_documentation(method.documentation.clone()),
                );
            }
            for field in declaring.fields.iter().filter(|f| visible(f.accessibility)) {
                if field.name == "value__" {
                    continue;
                }
                push(
                    &mut entries,
                    CompletionEntry::new(field.name.clone(), EntryKind::Field)
                        .with_detail(self.syntax.type_display(&field.type_name).to_string())
                        .with_documentation(field.documentation.clone()),
                );
            }
            for event in declaring.events.iter().filter(|e| visible(e.accessibility)) {
                push(
                    &mut entries,
                    CompletionEntry::new(event.name.clone(), EntryKind::Event)
                        .with_detail(event.delegate_type.clone())
                        .with_documentation(event.documentation.clone()),
                );
            }
        }
        entries
    }

    /// Code-behind members, designer fields and keywords.
    pub fn scope_entries(&self) -> Vec<CompletionEntry> {
        let mut entries: Vec<CompletionEntry> = self
            .document
            .fields
            .iter()
            .map(|f| {
                CompletionEntry::new(f.name.clone(), EntryKind::Field)
                    .with_detail(f.type_name.clone())
            })
            .collect();

        match self.this_type() {
            Some(this) => {
                for entry in self.member_entries(this, true) {
                    if !entries.iter().any(|e| e.label.eq_ignore_ascii_case(&entry.label)) {
                        entries.push(entry);
                    }
                }
            }
            None => debug!("Base class {} is not in the type index", self.document.base_class),
        }

        entries.extend(
            self.syntax
                .keywords
                .iter()
                .map(|k| CompletionEntry::new(*k, EntryKind::Keyword)),
        );
        entries
    }

    /// Overloads of the call under the caret.
    pub fn overloads(&self, site: &CallSite) -> Vec<&'a MethodDefinition> {
        let owner = if site.target.is_empty() {
            self.this_type()
        } else {
            self.resolve_chain(&site.target)
        };
        let Some(owner) = owner else {
            return Vec::new();
        };
        self.hierarchy(owner)
            .into_iter()
            .flat_map(|t| t.methods.iter())
            .filter(|m| m.name.eq_ignore_ascii_case(&site.method))
            .collect()
    }

    pub fn render_signature(&self, method: &MethodDefinition) -> String {
        let parameters: Vec<String> = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", self.syntax.type_display(&p.type_name), p.name))
            .collect();
        format!(
            "{} {}({})",
            self.syntax.type_display(&method.return_type),
            method.name,
            parameters.join(", ")
        )
    }

    pub fn signature_help(&self, site: &CallSite) -> Option<SignatureHelp> {
        let overloads = self.overloads(site);
        if overloads.is_empty() {
            return None;
        }
        let active_signature = overloads
            .iter()
            .position(|m| m.parameters.len() as u32 > site.active_parameter)
            .unwrap_or(0);
        let signatures = overloads
            .iter()
            .map(|method| SignatureInformation {
                label: self.render_signature(method),
                documentation: method
                    .documentation
                    .clone()
                    .map(tower_lsp::lsp_types::Documentation::String),
                parameters: Some(
                    method
                        .parameters
                        .iter()
                        .map(|p| ParameterInformation {
                            label: ParameterLabel::Simple(format!(
                                "{} {}",
                                self.syntax.type_display(&p.type_name),
                                p.name
                            )),
                            documentation: None,
                        })
                        .collect(),
                ),
                active_parameter: None,
            })
            .collect();
        Some(SignatureHelp {
            signatures,
            active_signature: Some(active_signature as u32),
            active_parameter: Some(site.active_parameter),
        })
    }
}

/// Completion shared by the builders: members after `target.`, else scope.
pub fn complete_members(
    syntax: &Syntax,
    document: &BuiltDocument,
    local: &LocalDocument,
    index: &dyn TypeIndex,
) -> Vec<CompletionEntry> {
    let resolver = MemberResolver { index, document, syntax };
    let (chain, partial) = member_access(local.before_caret());
    if chain.is_empty() {
        return resolver.scope_entries();
    }
    match resolver.resolve_chain(&chain) {
        Some(ty) => {
            let on_self = chain.len() == 1 && chain[0].name.eq_ignore_ascii_case(syntax.self_keyword);
            resolver.member_entries(ty, on_self)
        }
        None => {
            debug!("Unresolved member access before {:?}", partial);
            Vec::new()
        }
    }
}

pub fn parameter_help(
    syntax: &Syntax,
    document: &BuiltDocument,
    local: &LocalDocument,
    index: &dyn TypeIndex,
) -> Option<SignatureHelp> {
    let site = call_site(local.before_caret())?;
    MemberResolver { index, document, syntax }.signature_help(&site)
}

/// Simple name of a possibly namespace-qualified class.
pub fn simple_class_name(class_name: &str) -> &str {
    class_name.rsplit('.').next().unwrap_or(class_name)
}

/// Start of the line holding `offset`, when only whitespace precedes it.
pub fn line_start_if_blank(source: &str, offset: usize) -> usize {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if source[line_start..offset].trim().is_empty() {
        line_start
    } else {
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(name: &str, invoked: bool) -> ChainSegment {
        ChainSegment { name: name.to_string(), invoked }
    }

    #[test]
    fn test_member_access_chain() {
        assert_eq!(member_access("Foo"), (vec![], "Foo".to_string()));
        assert_eq!(
            member_access(" Request.QueryString."),
            (vec![segment("Request", false), segment("QueryString", false)], String::new())
        );
        assert_eq!(
            member_access("x + Name.Trim().To"),
            (vec![segment("Name", false), segment("Trim", true)], "To".to_string())
        );
    }

    #[test]
    fn test_call_site() {
        let site = call_site(r#"Response.Write(Format("a, b", x, "#).unwrap();
        assert_eq!(site.method, "Format");
        assert!(site.target.is_empty());
        assert_eq!(site.active_parameter, 2);

        let outer = call_site("Response.Write(").unwrap();
        assert_eq!(outer.target, vec![segment("Response", false)]);
        assert_eq!(outer.method, "Write");
        assert_eq!(outer.active_parameter, 0);

        assert!(call_site("Foo(1)").is_none());
    }

    #[test]
    fn test_local_document_stops_at_close() {
        let local = LocalDocument::new(ExpressionKind::Render, " Title.", "Length %> <p>");
        assert_eq!(local.code, " Title.Length ");
        assert_eq!(local.before_caret(), " Title.");
    }
}
