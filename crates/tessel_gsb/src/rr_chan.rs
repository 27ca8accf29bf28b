//! Channel aggregates: the ordered tracks of one channel at one coordinate.

use crate::error::GsbError;
use tessel_common::{Coord, GridRange};
use tessel_rrgraph::{Direction, RrGraph, RrNodeId, RrNodeType, SegmentId};

/// The tracks of one routing channel, in the graph's track order.
///
/// Each track carries its node, its global direction, and its resolved segment
/// type. A channel on a fabric border is simply empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RrChan {
    node_type: RrNodeType,
    nodes: Vec<RrNodeId>,
    directions: Vec<Direction>,
    segments: Vec<SegmentId>,
}

impl RrChan {
    /// Creates an empty channel of the given axis.
    pub fn new(node_type: RrNodeType) -> Self {
        Self {
            node_type,
            nodes: Vec::new(),
            directions: Vec::new(),
            segments: Vec::new(),
        }
    }

    /// Appends a track.
    pub fn add_node(&mut self, node: RrNodeId, direction: Direction, segment: SegmentId) {
        self.nodes.push(node);
        self.directions.push(direction);
        self.segments.push(segment);
    }

    /// Channel axis.
    pub fn node_type(&self) -> RrNodeType {
        self.node_type
    }

    /// Number of tracks.
    pub fn width(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for a channel with no tracks.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node of track `track`.
    pub fn node(&self, track: usize) -> RrNodeId {
        self.nodes[track]
    }

    /// Direction of track `track`.
    pub fn direction(&self, track: usize) -> Direction {
        self.directions[track]
    }

    /// Segment type of track `track`.
    pub fn segment(&self, track: usize) -> SegmentId {
        self.segments[track]
    }

    /// All track nodes in order.
    pub fn nodes(&self) -> &[RrNodeId] {
        &self.nodes
    }

    /// Position of `node` in this channel.
    pub fn index_of(&self, node: RrNodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// Distinct segment types used by this channel, ascending.
    pub fn segment_ids(&self) -> Vec<SegmentId> {
        let mut ids = self.segments.clone();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Returns `true` if `other` would be generated as the same channel module.
    ///
    /// Node identity is ignored: two channels match when their axis, width,
    /// per-track direction, and per-track segment type agree.
    pub fn is_mirror(&self, other: &RrChan) -> bool {
        self.node_type == other.node_type
            && self.directions == other.directions
            && self.segments == other.segments
    }

    /// Cyclically permutes the tracks with direction `direction`.
    ///
    /// Position `i` of the subset receives the track at `i + offset`; with
    /// `counter` set it receives the track at `i - offset` instead. Returns the
    /// subset size.
    pub(crate) fn rotate_subset(
        &mut self,
        direction: Direction,
        offset: usize,
        counter: bool,
    ) -> usize {
        let positions: Vec<usize> = (0..self.width())
            .filter(|&i| self.directions[i] == direction)
            .collect();
        let n = positions.len();
        if n == 0 {
            return 0;
        }
        let shift = offset % n;
        if shift == 0 {
            return n;
        }
        let nodes: Vec<RrNodeId> = positions.iter().map(|&p| self.nodes[p]).collect();
        let segments: Vec<SegmentId> = positions.iter().map(|&p| self.segments[p]).collect();
        for (i, &p) in positions.iter().enumerate() {
            let src = if counter {
                (i + n - shift) % n
            } else {
                (i + shift) % n
            };
            self.nodes[p] = nodes[src];
            self.segments[p] = segments[src];
        }
        n
    }
}

/// Builds the channel of axis `node_type` at `(x, y)` from the graph.
///
/// Every track's segment type is resolved through its cost index. A segment
/// index outside the segment table means the graph is corrupt and aborts the
/// build.
pub fn build_rr_chan(
    graph: &RrGraph,
    node_type: RrNodeType,
    x: usize,
    y: usize,
) -> Result<RrChan, GsbError> {
    let mut chan = RrChan::new(node_type);
    let num_segments = graph.num_segments();
    for (track, &id) in graph.chan_nodes(node_type, x, y).iter().enumerate() {
        let node = graph.node(id);
        let seg_index = graph
            .segment_index(id)
            .ok_or(GsbError::CostIndexOutOfRange {
                node: id,
                cost_index: node.cost_index,
                x,
                y,
            })?;
        if seg_index < 0 || seg_index as usize >= num_segments {
            return Err(GsbError::SegmentOutOfRange {
                axis: node_type,
                x,
                y,
                track,
                seg_index,
                num_segments,
            });
        }
        chan.add_node(id, node.direction, SegmentId::from_raw(seg_index as u32));
    }
    Ok(chan)
}

/// One axis worth of channels with their unique-module assignment.
#[derive(Debug, Clone, Default)]
struct ChanModules {
    /// Unique channel modules, in discovery order.
    modules: Vec<RrChan>,
    /// Module ID of each channel, keyed by coordinate.
    module_ids: Vec<(Coord, usize)>,
}

impl ChanModules {
    fn add(&mut self, coord: Coord, chan: RrChan) {
        let id = match self.modules.iter().position(|m| m.is_mirror(&chan)) {
            Some(id) => id,
            None => {
                self.modules.push(chan);
                self.modules.len() - 1
            }
        };
        self.module_ids.push((coord, id));
    }
}

/// Every X and Y channel of the device, clustered into unique modules.
#[derive(Debug, Clone)]
pub struct DeviceRrChan {
    chanx: ChanModules,
    chany: ChanModules,
}

impl DeviceRrChan {
    /// Builds all channels of the device.
    ///
    /// X channels exist at `x ∈ 1..=nx, y ∈ 0..=ny` and are visited row by row;
    /// Y channels exist at `x ∈ 0..=nx, y ∈ 1..=ny` and are visited column by
    /// column.
    pub fn build(graph: &RrGraph, range: GridRange) -> Result<Self, GsbError> {
        let mut chanx = ChanModules::default();
        for y in 0..=range.ny {
            for x in 1..=range.nx {
                chanx.add(Coord::new(x, y), build_rr_chan(graph, RrNodeType::ChanX, x, y)?);
            }
        }
        let mut chany = ChanModules::default();
        for x in 0..=range.nx {
            for y in 1..=range.ny {
                chany.add(Coord::new(x, y), build_rr_chan(graph, RrNodeType::ChanY, x, y)?);
            }
        }
        Ok(Self { chanx, chany })
    }

    fn axis(&self, node_type: RrNodeType) -> Option<&ChanModules> {
        match node_type {
            RrNodeType::ChanX => Some(&self.chanx),
            RrNodeType::ChanY => Some(&self.chany),
            RrNodeType::Opin | RrNodeType::Ipin => None,
        }
    }

    /// Number of unique channel modules of an axis.
    pub fn num_modules(&self, node_type: RrNodeType) -> usize {
        self.axis(node_type).map_or(0, |a| a.modules.len())
    }

    /// Number of channels of an axis.
    pub fn num_channels(&self, node_type: RrNodeType) -> usize {
        self.axis(node_type).map_or(0, |a| a.module_ids.len())
    }

    /// Unique channel module `id` of an axis.
    pub fn module(&self, node_type: RrNodeType, id: usize) -> Option<&RrChan> {
        self.axis(node_type).and_then(|a| a.modules.get(id))
    }

    /// Module ID of the channel at `coord`.
    pub fn module_id(&self, node_type: RrNodeType, coord: Coord) -> Option<usize> {
        self.axis(node_type).and_then(|a| {
            a.module_ids
                .iter()
                .find(|(c, _)| *c == coord)
                .map(|&(_, id)| id)
        })
    }
}
