//! `<%@ ... %>` directive completions.

use tracing::debug;

use super::entry::{CompletionEntry, EntryKind};
use crate::markup::node::AttributeSet;
use crate::markup::page_info::{DocumentKind, TagRegistrations};
use crate::type_system::TypeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueSource {
    Text,
    Boolean,
    Language,
    Inherits,
    TagPrefix,
    Choice(&'static [&'static str]),
}

use ValueSource::*;

struct DirectiveAttribute {
    name: &'static str,
    values: ValueSource,
    description: &'static str,
}

const fn attr(name: &'static str, values: ValueSource, description: &'static str) -> DirectiveAttribute {
    DirectiveAttribute { name, values, description }
}

const SESSION_STATE: &[&str] = &["true", "false", "ReadOnly"];
const VIEW_STATE_ENCRYPTION: &[&str] = &["Auto", "Always", "Never"];
const CACHE_LOCATION: &[&str] = &["Any", "Client", "Downstream", "Server", "None", "ServerAndClient"];

const PAGE: &[DirectiveAttribute] = &[
    attr("Language", Language, "Language of inline code blocks"),
    attr("AutoEventWireup", Boolean, "Bind page events to methods by name"),
    attr("CodeFile", Text, "Path of the code-behind source file"),
    attr("CodeBehind", Text, "Path of the precompiled code-behind source file"),
    attr("Inherits", Inherits, "Code-behind class the page derives from"),
    attr("MasterPageFile", Text, "Master page of this content page"),
    attr("Title", Text, "Page title"),
    attr("Theme", Text, "Theme applied to the page"),
    attr("ClassName", Text, "Name of the generated class"),
    attr("EnableViewState", Boolean, "Keep view state across requests"),
    attr("EnableSessionState", Choice(SESSION_STATE), "Session state access"),
    attr("EnableEventValidation", Boolean, "Validate postback and callback events"),
    attr("ViewStateEncryptionMode", Choice(VIEW_STATE_ENCRYPTION), "View state encryption"),
    attr("MaintainScrollPositionOnPostback", Boolean, "Restore scroll position after postback"),
    attr("ValidateRequest", Boolean, "Reject potentially dangerous input"),
    attr("Async", Boolean, "Page is an asynchronous handler"),
    attr("Debug", Boolean, "Compile with debug symbols"),
    attr("Trace", Boolean, "Enable tracing"),
    attr("ErrorPage", Text, "Redirect target for unhandled errors"),
    attr("Culture", Text, "Culture setting"),
    attr("UICulture", Text, "User interface culture setting"),
    attr("ResponseEncoding", Text, "Response content encoding"),
];

const CONTROL: &[DirectiveAttribute] = &[
    attr("Language", Language, "Language of inline code blocks"),
    attr("AutoEventWireup", Boolean, "Bind control events to methods by name"),
    attr("CodeFile", Text, "Path of the code-behind source file"),
    attr("CodeBehind", Text, "Path of the precompiled code-behind source file"),
    attr("Inherits", Inherits, "Code-behind class the control derives from"),
    attr("ClassName", Text, "Name of the generated class"),
    attr("EnableViewState", Boolean, "Keep view state across requests"),
    attr("Description", Text, "Description of the control"),
    attr("Debug", Boolean, "Compile with debug symbols"),
];

const MASTER: &[DirectiveAttribute] = &[
    attr("Language", Language, "Language of inline code blocks"),
    attr("AutoEventWireup", Boolean, "Bind page events to methods by name"),
    attr("CodeFile", Text, "Path of the code-behind source file"),
    attr("CodeBehind", Text, "Path of the precompiled code-behind source file"),
    attr("Inherits", Inherits, "Code-behind class the master page derives from"),
    attr("MasterPageFile", Text, "Master page this master page nests in"),
    attr("ClassName", Text, "Name of the generated class"),
    attr("EnableViewState", Boolean, "Keep view state across requests"),
    attr("Debug", Boolean, "Compile with debug symbols"),
];

const SERVICE: &[DirectiveAttribute] = &[
    attr("Language", Language, "Language of the service class"),
    attr("Class", Text, "Class implementing the service"),
    attr("CodeBehind", Text, "Path of the service source file"),
    attr("Debug", Boolean, "Compile with debug symbols"),
];

const IMPORT: &[DirectiveAttribute] = &[attr("Namespace", Text, "Namespace to import")];

const REGISTER: &[DirectiveAttribute] = &[
    attr("TagPrefix", TagPrefix, "Prefix used for the registered tags"),
    attr("TagName", Text, "Tag name of a user control"),
    attr("Src", Text, "Path of a user control"),
    attr("Namespace", Text, "Namespace of the registered controls"),
    attr("Assembly", Text, "Assembly of the registered controls"),
];

const ASSEMBLY: &[DirectiveAttribute] = &[
    attr("Name", Text, "Assembly to link"),
    attr("Src", Text, "Source file to compile and link"),
];

const IMPLEMENTS: &[DirectiveAttribute] = &[attr("Interface", Text, "Interface the page implements")];

const REFERENCE: &[DirectiveAttribute] = &[
    attr("Page", Text, "Page to compile and link"),
    attr("Control", Text, "User control to compile and link"),
    attr("VirtualPath", Text, "Virtual path of the referenced file"),
];

const OUTPUT_CACHE: &[DirectiveAttribute] = &[
    attr("Duration", Text, "Seconds the output is cached"),
    attr("Location", Choice(CACHE_LOCATION), "Where the output is cached"),
    attr("VaryByParam", Text, "Parameters the cache varies by"),
    attr("VaryByControl", Text, "Controls the cache varies by"),
    attr("VaryByCustom", Text, "Custom cache variation"),
    attr("VaryByHeader", Text, "Headers the cache varies by"),
    attr("CacheProfile", Text, "Cache profile from configuration"),
    attr("Shared", Boolean, "Share cached output between pages"),
    attr("NoStore", Boolean, "Send Cache-Control: no-store"),
];

const TYPED_REFERENCE: &[DirectiveAttribute] = &[
    attr("TypeName", Text, "Type of the referenced page"),
    attr("VirtualPath", Text, "Virtual path of the referenced page"),
];

fn attributes_of(directive: &str) -> Option<&'static [DirectiveAttribute]> {
    let table = match directive.to_ascii_lowercase().as_str() {
        "page" => PAGE,
        "control" => CONTROL,
        "master" => MASTER,
        "webservice" | "webhandler" => SERVICE,
        "import" => IMPORT,
        "register" => REGISTER,
        "assembly" => ASSEMBLY,
        "implements" => IMPLEMENTS,
        "reference" => REFERENCE,
        "outputcache" => OUTPUT_CACHE,
        "mastertype" | "previouspagetype" => TYPED_REFERENCE,
        _ => return None,
    };
    Some(table)
}

/// Directive names valid in a document of `kind`.
pub fn directive_names(kind: DocumentKind) -> Vec<CompletionEntry> {
    let names: &[&str] = match kind {
        DocumentKind::Page => &[
            "Page", "Import", "Register", "Assembly", "Implements", "Reference", "OutputCache",
            "MasterType", "PreviousPageType",
        ],
        DocumentKind::Control => {
            &["Control", "Import", "Register", "Assembly", "Implements", "Reference", "OutputCache"]
        }
        DocumentKind::Master => &[
            "Master", "Import", "Register", "Assembly", "Implements", "Reference", "MasterType",
        ],
        DocumentKind::WebService => &["WebService", "Assembly"],
        DocumentKind::Handler => &["WebHandler", "Assembly"],
    };
    names
        .iter()
        .map(|name| CompletionEntry::new(*name, EntryKind::Directive).with_detail("ASP.NET directive"))
        .collect()
}

/// Attribute names of `directive` not already present.
pub fn directive_attributes(directive: &str, existing: &AttributeSet) -> Vec<CompletionEntry> {
    let Some(table) = attributes_of(directive) else {
        debug!("No attributes known for directive {:?}", directive);
        return Vec::new();
    };
    table
        .iter()
        .filter(|a| !existing.contains(a.name))
        .map(|a| CompletionEntry::new(a.name, EntryKind::Attribute).with_detail(a.description))
        .collect()
}

/// Values for `attribute` of `directive`.
///
/// `Inherits` lists types deriving from the base class of the directive's
/// document kind; `TagPrefix` lists prefixes already registered.
pub fn directive_attribute_values(
    directive: &str,
    attribute: &str,
    index: &dyn TypeIndex,
    registrations: &TagRegistrations,
) -> Vec<CompletionEntry> {
    let Some(known) =
        attributes_of(directive).and_then(|t| t.iter().find(|a| a.name.eq_ignore_ascii_case(attribute)))
    else {
        return Vec::new();
    };

    let value = |label: &str| CompletionEntry::new(label, EntryKind::Value);
    match known.values {
        Text => Vec::new(),
        Boolean => vec![value("true"), value("false")],
        Language => vec![value("C#"), value("VB")],
        Choice(choices) => choices.iter().map(|c| value(*c)).collect(),
        TagPrefix => registrations.prefixes().into_iter().map(value).collect(),
        Inherits => {
            let base = match directive.to_ascii_lowercase().as_str() {
                "control" => DocumentKind::Control.base_type(),
                "master" => DocumentKind::Master.base_type(),
                _ => DocumentKind::Page.base_type(),
            };
            let mut types: Vec<String> = index
                .types()
                .filter(|t| !t.full_name().eq_ignore_ascii_case(base))
                .filter(|t| index.is_subclass_of(t, base))
                .map(|t| t.full_name())
                .collect();
            types.sort();
            types
                .into_iter()
                .map(|name| CompletionEntry::new(name, EntryKind::Class).with_detail(base))
                .collect()
        }
    }
}
