//! Document-level facts gathered from directives and the DOCTYPE.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::node::{DirectiveNode, MarkupNode, NodeKind, OtherKind};

static DOCTYPE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:PUBLIC|public)\s+"(?<fpi>[^"]*)"\s+"(?<uri>[^"]*)""#)
        .expect("doctype pattern compiles")
});

/// Namespace of the built-in `asp` prefix.
pub const ASP_NAMESPACE: &str = "System.Web.UI.WebControls";
pub const ASP_PREFIX: &str = "asp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Page,
    Control,
    Master,
    WebService,
    Handler,
}

impl DocumentKind {
    /// Document kind from a file name or URI path. Unknown extensions are pages.
    pub fn from_path(path: &str) -> Self {
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "ascx" => DocumentKind::Control,
            "master" => DocumentKind::Master,
            "asmx" => DocumentKind::WebService,
            "ashx" => DocumentKind::Handler,
            _ => DocumentKind::Page,
        }
    }

    /// Name of the directive that describes a document of this kind.
    pub fn main_directive(&self) -> &'static str {
        match self {
            DocumentKind::Page => "Page",
            DocumentKind::Control => "Control",
            DocumentKind::Master => "Master",
            DocumentKind::WebService => "WebService",
            DocumentKind::Handler => "WebHandler",
        }
    }

    /// Type every code-behind class of this kind derives from.
    pub fn base_type(&self) -> &'static str {
        match self {
            DocumentKind::Page => "System.Web.UI.Page",
            DocumentKind::Control => "System.Web.UI.UserControl",
            DocumentKind::Master => "System.Web.UI.MasterPage",
            DocumentKind::WebService => "System.Web.Services.WebService",
            DocumentKind::Handler => "System.Web.IHttpHandler",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocType {
    pub public_fpi: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub kind: DocumentKind,
    pub language: String,
    pub inherits: Option<String>,
    pub code_file: Option<String>,
    pub master_page_file: Option<String>,
    pub doc_type: Option<DocType>,
}

impl PageInfo {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            language: "C#".to_string(),
            inherits: None,
            code_file: None,
            master_page_file: None,
            doc_type: None,
        }
    }

    pub fn from_document(path: &str, text: &str, root: &MarkupNode) -> Self {
        let mut info = PageInfo::new(DocumentKind::from_path(path));

        let main = info.kind.main_directive();
        if let Some(directive) = root
            .directives()
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(main))
        {
            info.apply_directive(directive);
        }

        info.doc_type = find_doc_type(text, root);
        debug!(
            "Page info for {}: kind={:?} language={} inherits={:?}",
            path, info.kind, info.language, info.inherits
        );
        info
    }

    fn apply_directive(&mut self, directive: &DirectiveNode) {
        let attribute = |name: &str| {
            directive
                .attributes
                .get(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        if let Some(language) = attribute("Language") {
            self.language = language;
        }
        self.inherits = attribute("Inherits");
        self.code_file = attribute("CodeFile").or_else(|| attribute("CodeBehind"));
        self.master_page_file = attribute("MasterPageFile");
    }

    /// A content page attached to a master page.
    pub fn is_content_page(&self) -> bool {
        self.kind == DocumentKind::Page && self.master_page_file.is_some()
    }
}

fn find_doc_type(text: &str, root: &MarkupNode) -> Option<DocType> {
    let node = root
        .children
        .iter()
        .find(|n| n.kind == NodeKind::Other(OtherKind::DocType))?;
    let start = byte_offset(text, node.range.start.line, node.range.start.column)?;
    let end = byte_offset(text, node.range.end.line, node.range.end.column)?;
    let source = text.get(start..end)?;
    let captures = DOCTYPE_REGEX.captures(source)?;
    Some(DocType {
        public_fpi: captures.name("fpi").map(|m| m.as_str().to_string()).unwrap_or_default(),
        uri: captures.name("uri").map(|m| m.as_str().to_string()).unwrap_or_default(),
    })
}

/// Byte offset of a line/UTF-16 column position in `text`.
pub fn byte_offset(text: &str, line: u32, column: u32) -> Option<usize> {
    let mut current_line = 0u32;
    let mut line_start = 0usize;
    if line > 0 {
        for (index, c) in text.char_indices() {
            if c == '\n' {
                current_line += 1;
                if current_line == line {
                    line_start = index + 1;
                    break;
                }
            }
        }
        if current_line != line {
            return None;
        }
    }
    let mut units = 0u32;
    for (index, c) in text[line_start..].char_indices() {
        if units >= column || c == '\n' {
            return Some(line_start + index);
        }
        units += c.len_utf16() as u32;
    }
    Some(text.len())
}

/// A `<%@ Register TagPrefix TagName Src %>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserControlRegistration {
    pub prefix: String,
    pub name: String,
    pub src: String,
}

impl UserControlRegistration {
    /// File stem of `src`, the conventional user-control class name.
    pub fn class_name(&self) -> &str {
        let file = self.src.rsplit(['/', '\\']).next().unwrap_or(&self.src);
        file.split('.').next().unwrap_or(file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRegistration {
    pub prefix: String,
    pub namespace: String,
    pub assembly: Option<String>,
}

/// Tag prefixes known to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRegistrations {
    namespaces: Vec<NamespaceRegistration>,
    user_controls: Vec<UserControlRegistration>,
}

impl Default for TagRegistrations {
    fn default() -> Self {
        Self {
            namespaces: vec![NamespaceRegistration {
                prefix: ASP_PREFIX.to_string(),
                namespace: ASP_NAMESPACE.to_string(),
                assembly: None,
            }],
            user_controls: Vec::new(),
        }
    }
}

impl TagRegistrations {
    pub fn from_document(root: &MarkupNode) -> Self {
        let mut registrations = Self::default();
        for directive in root.directives() {
            if directive.name.eq_ignore_ascii_case("Register") {
                registrations.register(directive);
            }
        }
        registrations
    }

    fn register(&mut self, directive: &DirectiveNode) {
        let attributes = &directive.attributes;
        let Some(prefix) = attributes.get("TagPrefix").map(str::trim).filter(|p| !p.is_empty())
        else {
            debug!("Register directive without TagPrefix ignored");
            return;
        };
        if let (Some(name), Some(src)) = (attributes.get("TagName"), attributes.get("Src")) {
            self.user_controls.push(UserControlRegistration {
                prefix: prefix.to_string(),
                name: name.trim().to_string(),
                src: src.trim().to_string(),
            });
        } else if let Some(namespace) = attributes.get("Namespace") {
            self.namespaces.push(NamespaceRegistration {
                prefix: prefix.to_string(),
                namespace: namespace.trim().to_string(),
                assembly: attributes.get("Assembly").map(|a| a.trim().to_string()),
            });
        }
    }

    /// Namespaces registered under `prefix`, in registration order.
    pub fn namespaces_for<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.namespaces
            .iter()
            .filter(move |r| r.prefix.eq_ignore_ascii_case(prefix))
            .map(|r| r.namespace.as_str())
    }

    pub fn user_control(&self, prefix: &str, name: &str) -> Option<&UserControlRegistration> {
        self.user_controls
            .iter()
            .find(|r| r.prefix.eq_ignore_ascii_case(prefix) && r.name.eq_ignore_ascii_case(name))
    }

    pub fn namespaces(&self) -> &[NamespaceRegistration] {
        &self.namespaces
    }

    pub fn user_controls(&self) -> &[UserControlRegistration] {
        &self.user_controls
    }

    /// Distinct prefixes, first registration wins the spelling.
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = Vec::new();
        let all = self
            .namespaces
            .iter()
            .map(|r| r.prefix.as_str())
            .chain(self.user_controls.iter().map(|r| r.prefix.as_str()));
        for prefix in all {
            if !prefixes.iter().any(|p| p.eq_ignore_ascii_case(prefix)) {
                prefixes.push(prefix);
            }
        }
        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parser::parse_document;
    use indoc::indoc;

    #[test]
    fn test_page_info_from_page_directive() {
        let text = indoc! {r#"
            <%@ Page Language="VB" Inherits="Site.Default" CodeBehind="Default.aspx.vb" MasterPageFile="~/Site.master" %>
            <!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
        "#};
        let root = parse_document(text);
        let info = PageInfo::from_document("file:///site/Default.aspx", text, &root);
        assert_eq!(info.kind, DocumentKind::Page);
        assert_eq!(info.language, "VB");
        assert_eq!(info.inherits.as_deref(), Some("Site.Default"));
        assert_eq!(info.code_file.as_deref(), Some("Default.aspx.vb"));
        assert!(info.is_content_page());
        let doc_type = info.doc_type.unwrap();
        assert_eq!(doc_type.public_fpi, "-//W3C//DTD XHTML 1.0 Strict//EN");
    }

    #[test]
    fn test_defaults_without_directive() {
        let root = parse_document("<div></div>");
        let info = PageInfo::from_document("Widget.ascx", "<div></div>", &root);
        assert_eq!(info.kind, DocumentKind::Control);
        assert_eq!(info.language, "C#");
        assert!(info.inherits.is_none());
    }

    #[test]
    fn test_registrations() {
        let text = indoc! {r#"
            <%@ Register TagPrefix="ajax" Namespace="AjaxControlToolkit" Assembly="AjaxControlToolkit" %>
            <%@ Register TagPrefix="uc" TagName="Header" Src="~/Controls/Header.ascx" %>
        "#};
        let registrations = TagRegistrations::from_document(&parse_document(text));
        assert_eq!(registrations.namespaces_for("AJAX").collect::<Vec<_>>(), vec!["AjaxControlToolkit"]);
        assert_eq!(registrations.namespaces_for("asp").collect::<Vec<_>>(), vec![ASP_NAMESPACE]);
        let header = registrations.user_control("uc", "header").unwrap();
        assert_eq!(header.class_name(), "Header");
        assert_eq!(registrations.prefixes(), vec!["asp", "ajax", "uc"]);
    }

    #[test]
    fn test_byte_offset_utf16_columns() {
        let text = "a\u{1F600}b\nxy";
        assert_eq!(byte_offset(text, 0, 3), Some(5));
        assert_eq!(byte_offset(text, 1, 1), Some(8));
        assert_eq!(byte_offset(text, 2, 0), None);
    }
}
