//! Turns typed source ways into nodes and connections.

mod source;

pub use source::{SourceNode, SourceWay, WayTyper};

use std::collections::HashMap;

use crate::error::NetworkError;
use crate::geometry::{Point, Position};
use crate::logging::dev_log;
use crate::models::{Connections, NodeId, Nodes, TrackNetwork};

/// Counters of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ways accepted by a typer
    pub ways: usize,
    pub nodes: usize,
    pub connections: usize,
    /// Segments dropped because an end lies off land or both ends are the same node
    pub skipped_segments: usize,
}

fn everywhere(_: Point) -> bool {
    true
}

/// Adds source ways to a network, sharing nodes between ways by key.
///
/// Nodes for which the land filter answers `false` are never created, and
/// segments touching them are dropped.
pub struct TrackImporter<L = fn(Point) -> bool> {
    known: HashMap<u64, Option<NodeId>>,
    on_land: L,
    report: ImportReport,
}

impl TrackImporter {
    /// Importer that accepts nodes anywhere
    #[must_use]
    pub fn new() -> Self {
        Self::with_land_filter(everywhere)
    }
}

impl Default for TrackImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> TrackImporter<L>
where
    L: Fn(Point) -> bool,
{
    pub fn with_land_filter(on_land: L) -> Self {
        Self {
            known: HashMap::new(),
            on_land,
            report: ImportReport::default(),
        }
    }

    #[must_use]
    pub fn report(&self) -> ImportReport {
        self.report
    }

    /// Run every typer over all ways, one typer after the other
    ///
    /// # Errors
    ///
    /// Returns an error if the network rejects a connection
    pub fn import(
        &mut self,
        network: &mut TrackNetwork,
        ways: &[SourceWay],
        typers: &[&dyn WayTyper],
    ) -> Result<ImportReport, NetworkError> {
        for typer in typers {
            for way in ways {
                self.add_way(network, way, *typer)?;
            }
        }
        log::debug!(
            "Imported {} ways as {} nodes and {} connections",
            self.report.ways,
            self.report.nodes,
            self.report.connections
        );
        Ok(self.report)
    }

    /// Add one way if `typer` handles it; returns whether it did
    ///
    /// # Errors
    ///
    /// Returns an error if the network rejects a connection
    pub fn add_way(
        &mut self,
        network: &mut TrackNetwork,
        way: &SourceWay,
        typer: &dyn WayTyper,
    ) -> Result<bool, NetworkError> {
        let Some(track_type) = typer.track_type(way) else {
            return Ok(false);
        };
        let height_type = typer.height_type(way);
        self.report.ways += 1;

        for (from, to) in way.segments() {
            let (Some(start), Some(end)) = (self.node_for(network, from), self.node_for(network, to)) else {
                self.report.skipped_segments += 1;
                continue;
            };
            if start == end {
                dev_log!("Way {} repeats node {}", way.id, from.key);
                self.report.skipped_segments += 1;
                continue;
            }
            network.connect_typed(start, end, track_type, height_type, way.height_plane)?;
            self.report.connections += 1;
        }
        Ok(true)
    }

    fn node_for(&mut self, network: &mut TrackNetwork, source: &SourceNode) -> Option<NodeId> {
        if let Some(&known) = self.known.get(&source.key) {
            return known;
        }
        let node = (self.on_land)(source.position).then(|| network.add_node(Position::from(source.position)));
        if node.is_some() {
            self.report.nodes += 1;
        }
        self.known.insert(source.key, node);
        node
    }
}
