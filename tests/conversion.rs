//! End to end conversion of a small mixed scene through the public API.
//!
//! Run: cargo test --test conversion

use railbed::export::NetworkSnapshot;
use railbed::geometry::Point;
use railbed::height::ElevationSource;
use railbed::import::{SourceNode, SourceWay, TrackImporter, WayTyper};
use railbed::models::{HeightPlane, HeightType, NodeId, Nodes, Subnetwork, TrackNetwork, TrackType};
use railbed::{ConversionSettings, Pipeline};

struct TagTyper {
    key: &'static str,
    id: i64,
    subnetwork: Subnetwork,
}

impl WayTyper for TagTyper {
    fn track_type(&self, way: &SourceWay) -> Option<TrackType> {
        way.tag(self.key).map(|_| TrackType::new(self.id, self.subnetwork))
    }

    fn height_type(&self, way: &SourceWay) -> HeightType {
        if way.tag("bridge").is_some() {
            HeightType::Bridge
        } else {
            HeightType::OnGround
        }
    }
}

const RAIL: TagTyper = TagTyper {
    key: "railway",
    id: 1,
    subnetwork: Subnetwork::Rail,
};
const STREET: TagTyper = TagTyper {
    key: "highway",
    id: 2,
    subnetwork: Subnetwork::Street,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn way(id: u64, points: &[(u64, f64, f64)]) -> SourceWay {
    SourceWay::new(
        id,
        points
            .iter()
            .map(|&(key, x, y)| SourceNode {
                key,
                position: Point::new(x, y),
            })
            .collect(),
    )
}

/// A rail line that bridges over a street, plus a street junction east of it
fn scene() -> Vec<SourceWay> {
    let mut bridge = way(2, &[(11, 0.0, -20.0), (12, 0.0, 20.0)]).with_tag("railway", "rail").with_tag("bridge", "yes");
    bridge.height_plane = Some(HeightPlane(1));
    vec![
        way(1, &[(10, 0.0, -50.0), (11, 0.0, -20.0)]).with_tag("railway", "rail"),
        bridge,
        way(3, &[(12, 0.0, 20.0), (13, 0.0, 50.0)]).with_tag("railway", "rail"),
        way(4, &[(20, -50.0, 0.0), (21, 50.0, 0.0), (22, 100.0, 0.0)]).with_tag("highway", "primary"),
        way(5, &[(21, 50.0, 0.0), (23, 50.0, 40.0)]).with_tag("highway", "residential"),
    ]
}

fn elevation_at(network: &TrackNetwork, x: f64, y: f64) -> f64 {
    let id: NodeId = network
        .nodes()
        .find(|n| n.position().point == Point::new(x, y))
        .map(|n| n.id)
        .expect("node at position");
    network.elevation(id).expect("elevation set")
}

#[test]
fn test_mixed_scene_converts() {
    init_logging();
    let pipeline = Pipeline::new(ConversionSettings::default()).expect("default settings are valid");

    let (network, report) = pipeline
        .convert(&scene(), &[&RAIL, &STREET], &|_: Point| 0.0)
        .expect("conversion succeeds");

    assert_eq!(report.import.ways, 5);
    assert_eq!(report.import.nodes, 8);
    assert_eq!(report.import.connections, 6);
    assert_eq!(report.import.skipped_segments, 0);
    // Only the street junction has a side branch
    assert_eq!(report.cleanup.split, 1);
    assert_eq!(network.node_count(), 9);
    assert_eq!(report.solve.passes, 20);
    assert!(report.solve.final_cost <= report.solve.initial_cost);

    for node in network.nodes() {
        let h = node.elevation().expect("every node has an elevation");
        assert!(h.is_finite());
    }
    for (x, y) in [(-50.0, 0.0), (100.0, 0.0), (50.0, 40.0)] {
        assert!(elevation_at(&network, x, y).abs() < 2.0);
    }
    assert!(elevation_at(&network, 0.0, -20.0) > elevation_at(&network, 0.0, -50.0));
}

#[test]
fn test_off_land_nodes_are_dropped() {
    init_logging();
    let mut network = TrackNetwork::new();
    let mut importer = TrackImporter::with_land_filter(|p: Point| p.x < 75.0);

    let report = importer
        .import(&mut network, &scene(), &[&RAIL, &STREET])
        .expect("import succeeds");

    assert_eq!(report.nodes, 7);
    assert_eq!(report.skipped_segments, 1);
    assert_eq!(report.connections, 5);
    assert_eq!(network.node_count(), 7);
}

#[test]
fn test_snapshot_survives_json_and_bytes() {
    init_logging();
    let (network, _) = Pipeline::default()
        .convert(&scene(), &[&RAIL, &STREET], &|p: Point| p.y * 0.01)
        .expect("conversion succeeds");
    let snapshot = NetworkSnapshot::capture(&network);

    assert_eq!(snapshot.nodes.len(), network.node_count());
    assert!(snapshot.connections.iter().all(|c| c.height_fixed));
    assert_eq!(snapshot.connections.iter().filter(|c| c.track_type == 2).count(), 3);

    let json = snapshot.to_json().expect("json export");
    let parsed = NetworkSnapshot::from_json(&json).expect("json import");
    assert_eq!(parsed.connections, snapshot.connections);
    assert_eq!(parsed.nodes.len(), snapshot.nodes.len());

    let bytes = snapshot.to_bytes().expect("binary export");
    assert_eq!(NetworkSnapshot::from_bytes(&bytes).expect("binary import"), snapshot);

    let mut csv = Vec::new();
    snapshot.write_connections_csv(&mut csv).expect("csv export");
    let text = String::from_utf8(csv).expect("utf-8");
    assert_eq!(text.lines().count(), snapshot.connections.len() + 1);
}
