//! Benchmarks for markup completion
//!
//! - Parsing and page analysis of large pages
//! - Cursor classification near the end of a document
//! - Full completion requests for attributes, values and expressions

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tower_lsp::lsp_types::{Position, Url};

use aspnet_language_server::config::ServerConfig;
use aspnet_language_server::lsp::features::adapters::BuilderRegistry;
use aspnet_language_server::lsp::features::completion::{complete, CompletionServices};
use aspnet_language_server::lsp::DocumentSnapshot;
use aspnet_language_server::markup::{parse_document, MarkupTracker};
use aspnet_language_server::type_system::{InMemoryTypeIndex, TypeSystem};

const CODE_BEHIND_INDEX: &str = r#"{ "types": [
    { "namespace": "Bench", "name": "Default", "baseType": "System.Web.UI.Page",
      "methods": [
        { "name": "Row0_Click", "parameters": [
            { "name": "sender", "type": "System.Object" }, { "name": "e", "type": "System.EventArgs" } ] }
      ] }
] }"#;

/// A page with `rows` panels, each holding a few controls and an expression.
fn generate_page(rows: usize) -> String {
    let mut page = String::from(
        "<%@ Page Language=\"C#\" Inherits=\"Bench.Default\" CodeFile=\"Default.aspx.cs\" %>\n<form id=\"form1\" runat=\"server\">\n",
    );
    for i in 0..rows {
        page.push_str(&format!(
            "  <asp:Panel ID=\"Panel{i}\" runat=\"server\" CssClass=\"row\">\n    <asp:Label ID=\"Label{i}\" runat=\"server\" Text=\"Row {i}\" />\n    <asp:Button ID=\"Row{i}\" runat=\"server\" OnClick=\"Row{i}_Click\" />\n    <%= DateTime.Now.Year + {i} %>\n  </asp:Panel>\n"
        ));
    }
    page.push_str("</form>\n");
    page
}

/// Appends `tail` and returns the text with the position at its end.
fn with_cursor(page: &str, tail: &str) -> (String, Position) {
    let text = format!("{}{}", page, tail);
    let line = text.matches('\n').count() as u32;
    let character = text.rsplit('\n').next().unwrap_or("").encode_utf16().count() as u32;
    (text, Position { line, character })
}

fn type_system() -> TypeSystem {
    let mut index = InMemoryTypeIndex::with_bundled_baseline().expect("bundled index");
    index.merge(InMemoryTypeIndex::from_json_str(CODE_BEHIND_INDEX).expect("bench index"));
    TypeSystem::new(Arc::new(index))
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    for rows in [10, 100, 1000] {
        let page = generate_page(rows);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_document", rows), &page, |b, page| {
            b.iter(|| parse_document(black_box(page)))
        });
        group.bench_with_input(BenchmarkId::new("track_to_end", rows), &page, |b, page| {
            b.iter(|| MarkupTracker::track_to(black_box(page), page.len()))
        });
    }
    group.finish();
}

fn bench_completion(c: &mut Criterion) {
    let types = type_system();
    let builders = BuilderRegistry::with_defaults();
    let config = ServerConfig::default();
    let services = CompletionServices { types: &types, builders: &builders, config: &config };
    let uri = Url::parse("file:///bench/Default.aspx").expect("uri");

    let cases = [
        ("attribute_names", "<asp:Button runat=\"server\" "),
        ("event_values", "<asp:Button ID=\"Extra\" runat=\"server\" OnClick=\""),
        ("element_names", "<asp:Repeater runat=\"server\"><"),
        ("expression_members", "<%= this."),
    ];

    let mut group = c.benchmark_group("completion");
    for rows in [10, 100, 1000] {
        let page = generate_page(rows);
        for (name, tail) in cases {
            let (text, position) = with_cursor(&page, tail);
            let snapshot = DocumentSnapshot::new(uri.clone(), 1, &text);
            group.bench_with_input(BenchmarkId::new(name, rows), &snapshot, |b, snapshot| {
                b.iter(|| complete(black_box(snapshot), position, None, services))
            });
        }
    }
    group.finish();
}

fn bench_snapshot_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot");
    for rows in [10, 100, 1000] {
        let page = generate_page(rows);
        group.throughput(Throughput::Bytes(page.len() as u64));
        group.bench_with_input(BenchmarkId::new("new", rows), &page, |b, page| {
            let uri = Url::parse("file:///bench/Default.aspx").expect("uri");
            b.iter(|| DocumentSnapshot::new(uri.clone(), 1, black_box(page)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parsing, bench_completion, bench_snapshot_update);
criterion_main!(benches);
