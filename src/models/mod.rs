mod id;
mod node;
mod track;
pub(crate) mod track_network;

pub use id::{ConnectionId, IdCounter, NodeId};
pub use node::{AttachedTrack, TrackGroups, TrackNode};
pub use track::{Connection, Endpoint, HeightPlane, HeightType, Subnetwork, TrackType};
pub use track_network::{
    Cleanup, CleanupReport, Connections, Nodes, Straightness, TrackNetwork,
};
