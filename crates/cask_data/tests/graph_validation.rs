//! Structural validation of directed graphs under the acyclic / rooted /
//! single-root flags.

use cask_codec::{EntityReader, EntityWriter, ReadStream, WriteStream};
use cask_data::{validate_graph_nodes_in, Managed as _};
use cask_types::{DirectedGraph, GraphFlags, ItemTable, TableFlags, ValidationFlags, Validator};

fn validate(graph: &DirectedGraph<u32>) -> Validator {
    let mut validator = Validator::new();
    validator.set_record_descriptions(true);
    graph.validate(&mut validator).unwrap();
    validator
}

#[test]
fn cycle_is_reported_once() {
    // edges {(A,B), (B,C), (C,A), (A,D)} with A=1, B=2, C=3, D=4
    let mut graph = DirectedGraph::new(GraphFlags::ACYCLIC);
    graph.insert_edge(1, 2);
    graph.insert_edge(2, 3);
    graph.insert_edge(3, 1);
    graph.insert_edge(1, 4);

    let validator = validate(&graph);
    assert_eq!(validator.error_count(), 1);
    assert_eq!(validator.errors(), ValidationFlags::INVALID_SETUP);
    assert!(validator.descriptions()[0].message.contains("cycle"));
}

#[test]
fn acyclic_graph_passes() {
    let mut graph = DirectedGraph::new(GraphFlags::ACYCLIC);
    graph.insert_edge(1, 2);
    graph.insert_edge(1, 3);
    graph.insert_edge(2, 4);
    graph.insert_edge(3, 4);

    assert_eq!(validate(&graph).error_count(), 0);
}

#[test]
fn rooted_graph_requires_declared_roots() {
    let mut graph = DirectedGraph::new(GraphFlags::ROOTED);
    graph.insert_edge(1, 2);
    graph.insert_edge(2, 3);

    // node 1 is a computed root but is not in the Roots set
    let validator = validate(&graph);
    assert!(validator.errors().contains(ValidationFlags::MISSING_OBJECT));

    graph.add_root(1);
    assert_eq!(validate(&graph).error_count(), 0);
}

#[test]
fn root_with_incoming_edges_is_invalid() {
    let mut graph = DirectedGraph::new(GraphFlags::ROOTED);
    graph.insert_edge(1, 2);
    graph.add_root(1);
    graph.add_root(2);

    let validator = validate(&graph);
    assert!(validator.errors().contains(ValidationFlags::INVALID_OBJECT));
}

#[test]
fn unreachable_downstream_node_is_reported() {
    let mut graph = DirectedGraph::new(GraphFlags::ROOTED);
    graph.insert_edge(1, 2);
    graph.insert_edge(3, 4);
    graph.add_root(1);
    graph.add_root(3);

    // drop root 3 from the Roots set: 4 becomes unreachable, and 3 becomes
    // an undeclared computed root
    graph.roots_mut().remove(&3);
    let validator = validate(&graph);
    assert!(validator.errors().contains(ValidationFlags::INVALID_SETUP));
    assert!(validator.errors().contains(ValidationFlags::MISSING_OBJECT));
    assert!(validator
        .descriptions()
        .iter()
        .any(|issue| issue.message.contains("reached")));
}

#[test]
fn single_root_flag_counts_roots() {
    let mut graph = DirectedGraph::new(
        GraphFlags::ACYCLIC | GraphFlags::ROOTED | GraphFlags::SINGLE_ROOT,
    );
    graph.insert_edge(1, 3);
    graph.insert_edge(2, 3);
    graph.add_root(1);
    graph.add_root(2);

    // two computed roots, two declared roots
    let validator = validate(&graph);
    assert!(validator.errors().contains(ValidationFlags::INVALID_COUNT));

    let mut graph = DirectedGraph::new(
        GraphFlags::ACYCLIC | GraphFlags::ROOTED | GraphFlags::SINGLE_ROOT,
    );
    graph.insert_edge(1, 2);
    graph.insert_edge(2, 3);
    graph.add_root(1);
    assert_eq!(validate(&graph).error_count(), 0);
}

#[test]
fn empty_graph_passes_all_unrooted_checks() {
    let graph: DirectedGraph<u32> = DirectedGraph::new(GraphFlags::ACYCLIC);
    assert_eq!(validate(&graph).error_count(), 0);
}

#[test]
fn graph_nodes_can_be_checked_against_a_table() {
    let mut graph = DirectedGraph::new(GraphFlags::empty());
    graph.insert_edge(1_u32, 2);
    graph.insert_edge(2, 3);

    let mut table: ItemTable<u32, u64> = ItemTable::new(TableFlags::empty());
    *table.insert(1) = 100;
    *table.insert(2) = 200;

    let mut validator = Validator::new();
    validator.set_record_descriptions(true);
    validate_graph_nodes_in(&graph, &table, "Items", &mut validator);

    // node 3 appears in the edges but not in the table
    assert_eq!(validator.error_count(), 1);
    assert_eq!(validator.errors(), ValidationFlags::MISSING_OBJECT);
    assert!(validator.descriptions()[0].message.contains('3'));
}

#[test]
fn write_read_round_trip() {
    let mut graph = DirectedGraph::new(GraphFlags::ACYCLIC | GraphFlags::ROOTED);
    graph.add_root(10);
    graph.insert_edge(10, 20);
    graph.insert_edge(10, 30);
    graph.insert_edge(20, 40);

    let mut stream = WriteStream::new();
    let mut writer = EntityWriter::new(&mut stream);
    graph.write(&mut writer).unwrap();

    let bytes = stream.into_vec();
    let mut rs = ReadStream::new(&bytes);
    let mut reader = EntityReader::new(&mut rs);
    let mut read_back: DirectedGraph<u32> =
        DirectedGraph::new(GraphFlags::ACYCLIC | GraphFlags::ROOTED);
    read_back.read(&mut reader).unwrap();

    similar_asserts::assert_eq!(read_back, graph);
    assert_eq!(validate(&read_back).error_count(), 0);
}
