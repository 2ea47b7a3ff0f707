//! Plain HTML element names offered alongside server controls.

use super::entry::{CompletionEntry, EntryKind};

const FLOW_CONTENT: &[&str] = &[
    "a", "abbr", "address", "article", "aside", "audio", "b", "blockquote", "br", "button",
    "canvas", "code", "dd", "div", "dl", "em", "fieldset", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "i", "iframe", "img", "input", "label", "li", "main",
    "nav", "ol", "p", "pre", "script", "section", "select", "small", "span", "strong", "style",
    "sub", "sup", "table", "textarea", "ul", "video",
];

const HTML_CHILDREN: &[&str] = &["head", "body"];
const HEAD_CHILDREN: &[&str] = &["base", "link", "meta", "script", "style", "title"];
const TABLE_CHILDREN: &[&str] = &["caption", "colgroup", "tbody", "tfoot", "thead", "tr"];
const TABLE_SECTION_CHILDREN: &[&str] = &["tr"];
const ROW_CHILDREN: &[&str] = &["td", "th"];
const LIST_CHILDREN: &[&str] = &["li"];
const SELECT_CHILDREN: &[&str] = &["optgroup", "option"];
const DEFINITION_CHILDREN: &[&str] = &["dd", "dt"];

/// Element names allowed inside `parent`; `None` is the document root.
pub fn html_children_of(parent: Option<&str>) -> &'static [&'static str] {
    let Some(parent) = parent else {
        return &["html"];
    };
    match parent.to_ascii_lowercase().as_str() {
        "html" => HTML_CHILDREN,
        "head" => HEAD_CHILDREN,
        "table" => TABLE_CHILDREN,
        "thead" | "tbody" | "tfoot" => TABLE_SECTION_CHILDREN,
        "tr" => ROW_CHILDREN,
        "ul" | "ol" => LIST_CHILDREN,
        "select" => SELECT_CHILDREN,
        "dl" => DEFINITION_CHILDREN,
        _ => FLOW_CONTENT,
    }
}

pub fn add_html_elements(list: &mut Vec<CompletionEntry>, parent: Option<&str>) {
    list.extend(
        html_children_of(parent)
            .iter()
            .map(|name| CompletionEntry::new(*name, EntryKind::Element).with_detail("HTML element")),
    );
}

/// Comment and CDATA openers.
pub fn add_misc_begin_tags(list: &mut Vec<CompletionEntry>) {
    list.push(CompletionEntry::new("!--", EntryKind::BeginExpression).with_detail("XML comment"));
    list.push(CompletionEntry::new("![CDATA[", EntryKind::BeginExpression).with_detail("Character data"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_children_by_parent() {
        assert_eq!(html_children_of(Some("TR")), &["td", "th"]);
        assert!(html_children_of(Some("div")).contains(&"span"));
        assert_eq!(html_children_of(None), &["html"]);
    }
}
