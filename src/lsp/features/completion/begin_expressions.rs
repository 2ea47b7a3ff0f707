//! Server-block openers offered after `<`.

use super::entry::{CompletionEntry, EntryKind};
use crate::config::ClrVersion;

/// Adds the `<%` block forms valid for `clr_version`.
///
/// `%$` needs the 2.0 runtime; `%:` needs 4.0.
pub fn add_begin_expressions(list: &mut Vec<CompletionEntry>, clr_version: ClrVersion) {
    let entry = |label: &str, detail: &str| {
        CompletionEntry::new(label, EntryKind::BeginExpression).with_detail(detail)
    };
    list.push(entry("%", "ASP.NET render block"));
    list.push(entry("%=", "ASP.NET render expression"));
    list.push(entry("%@", "ASP.NET directive"));
    list.push(entry("%#", "ASP.NET databinding expression"));
    list.push(entry("%--", "ASP.NET server-side comment"));

    if clr_version >= ClrVersion::Net2_0 {
        list.push(entry("%$", "ASP.NET resource expression"));
    }
    if clr_version >= ClrVersion::Net4_0 {
        list.push(entry("%:", "ASP.NET HTML encoded expression"));
    }
}
