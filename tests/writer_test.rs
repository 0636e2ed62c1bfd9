use std::collections::BTreeMap;

use sysgraph::classify::BLOCK;
use sysgraph::context::MappingOptions;
use sysgraph::descriptor::Descriptor;
use sysgraph::graph::triples::RDFS_MEMBER;
use sysgraph::graph::{ResourceGraph, Triple};
use sysgraph::mapping::Mapper;
use sysgraph::meta::{default_prefixes, MetaInformation};
use sysgraph::model::*;
use sysgraph::types::OutputFormat;
use sysgraph::writer::*;
use tempfile::TempDir;

fn descriptor() -> Descriptor {
    Descriptor::new("http://example.com/sysgraph").unwrap()
}

fn small_graph() -> ResourceGraph {
    let model = SourceModel::new(
        vec![
            SourceElement::new("a", Metaclass::Class, "A").stereotyped(BLOCK),
            SourceElement::new("b", Metaclass::Class, "B")
                .stereotyped(BLOCK)
                .with_general("a"),
        ],
        vec![],
    )
    .unwrap();
    Mapper::run(&model, MappingOptions::new("proj", descriptor())).unwrap()
}

fn meta_with(entries: &[&str]) -> MetaInformation {
    let vocabs: BTreeMap<String, String> = default_prefixes(&descriptor());
    let entries: Vec<String> = entries.iter().map(|s| s.to_string()).collect();
    MetaInformation::parse(&vocabs, &entries).unwrap()
}

#[test]
fn test_render_json_document() {
    let graph = small_graph();
    let meta = meta_with(&["graph=g1"]);
    let payload = render(&graph, &descriptor(), &meta, OutputFormat::Json).unwrap();

    let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(value["graph"], "g1");
    assert_eq!(value["scope"], "proj");
    assert_eq!(value["resources"].as_array().unwrap().len(), 2);
    assert!(value.get("meta").is_none());
    assert_eq!(value["stats"]["resources_by_kind"]["blocks"], 2);
}

#[test]
fn test_render_triples_one_per_line() {
    let graph = small_graph();
    let meta = meta_with(&["dcterms:creator=alice", "graph=g1"]);
    let payload = render(&graph, &descriptor(), &meta, OutputFormat::Triples).unwrap();

    let triples: Vec<Triple> = payload
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(!triples.is_empty());
    let members = triples.iter().filter(|t| t.predicate == RDFS_MEMBER).count();
    assert_eq!(members, 2);
}

#[test]
fn test_stream_writer_writes_payload() {
    let mut writer = StreamWriter::new(Vec::new());
    writer.write("{}", OutputFormat::Json).unwrap();
    assert_eq!(writer.target(), "stream");
    assert_eq!(writer.into_inner(), b"{}\n".to_vec());
}

#[test]
fn test_file_writer_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out").join("graph.json");
    let mut writer = FileWriter::new(&path);
    writer.write("{\"ok\":true}", OutputFormat::Json).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"ok\":true}");
    assert!(!path.with_extension("tmp").exists());
    assert_eq!(writer.target(), path.display().to_string());
}

#[test]
fn test_http_writer_target_appends_graph_id() {
    let writer = HttpWriter::new("http://store.example.com/graphs/", "g1");
    assert_eq!(writer.url(), "http://store.example.com/graphs/g1");
}

#[test]
fn test_writer_for_picks_by_target() {
    assert_eq!(writer_for(None, "g").target(), "stream");
    assert_eq!(
        writer_for(Some("https://store.example.com"), "g").target(),
        "https://store.example.com/g"
    );
    assert_eq!(writer_for(Some("graph.json"), "g").target(), "graph.json");
}
