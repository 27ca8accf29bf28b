//! The device aggregate: every switch block of the fabric with its mirror tables.

use crate::cb::{block_coords, block_exists, host_gsb_coord, CbView};
use crate::equiv::{cb_equivalent, sb_equivalent, sb_side_segment_equivalent};
use crate::error::GsbError;
use crate::gsb::{BlockKind, ConfBits, RrGsb};
use crate::mirror::{MirrorStats, MirrorTable};
use crate::rotate::{rotate_for_mirror, RotatedGsb, RotationParams};
use crate::signature::{cb_signature, sb_side_segment_signature, sb_signature};
use serde::Serialize;
use tessel_common::{Coord, GridRange};
use tessel_rrgraph::{RrGraph, SegmentId, Side};

/// Unique submodule count for the tracks of one segment type on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SideSegmentStats {
    /// Switch-block side.
    pub side: Side,
    /// Segment type.
    pub segment: SegmentId,
    /// Distinct submodules.
    pub unique: usize,
    /// Switch blocks examined.
    pub total: usize,
}

/// Switch-block statistics after rotation canonicalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RotationStats {
    /// Distinct rotated switch blocks.
    pub unique: usize,
    /// Switch blocks examined.
    pub total: usize,
    /// Tiles where the offset wrapped a whole track subset.
    pub wrapped_tiles: usize,
    /// First such tile in scan order.
    pub first_wrapped: Option<Coord>,
}

/// Every switch block of an `nx × ny` fabric plus the mirror tables of all
/// three tile kinds.
///
/// Tiles are stored in [`GridRange::scan`] order. Connection blocks are views
/// over the switch blocks and are not stored separately.
#[derive(Debug, Clone)]
pub struct DeviceRrGsb {
    range: GridRange,
    gsbs: Vec<RrGsb>,
    sb_mirrors: MirrorTable,
    cbx_mirrors: MirrorTable,
    cby_mirrors: MirrorTable,
}

impl DeviceRrGsb {
    /// Wraps built tiles and assigns the mirrors of every kind.
    ///
    /// `gsbs` must hold one tile per coordinate of `range`, in scan order.
    pub fn new(graph: &RrGraph, range: GridRange, gsbs: Vec<RrGsb>) -> Result<Self, GsbError> {
        if gsbs.len() != range.len() {
            return Err(tessel_common::InternalError::new(format!(
                "expected {} switch blocks for a {}x{} grid, got {}",
                range.len(),
                range.nx,
                range.ny,
                gsbs.len()
            ))
            .into());
        }
        let sb_mirrors = assign_sb_mirrors(graph, range, &gsbs);
        let cbx_mirrors = assign_cb_mirrors(graph, range, &gsbs, BlockKind::CbX);
        let cby_mirrors = assign_cb_mirrors(graph, range, &gsbs, BlockKind::CbY);
        Ok(Self {
            range,
            gsbs,
            sb_mirrors,
            cbx_mirrors,
            cby_mirrors,
        })
    }

    /// Grid extent.
    pub fn range(&self) -> GridRange {
        self.range
    }

    /// All switch blocks in scan order.
    pub fn gsbs(&self) -> &[RrGsb] {
        &self.gsbs
    }

    /// The switch block at `coord`.
    pub fn gsb(&self, coord: Coord) -> Result<&RrGsb, GsbError> {
        if !self.range.contains(coord) {
            return Err(GsbError::OutOfRange {
                kind: BlockKind::Sb,
                x: coord.x,
                y: coord.y,
            });
        }
        Ok(&self.gsbs[self.range.index_of(coord)])
    }

    fn host_index(&self, kind: BlockKind, coord: Coord) -> Result<usize, GsbError> {
        if !block_exists(kind, self.range, coord) {
            return Err(GsbError::OutOfRange {
                kind,
                x: coord.x,
                y: coord.y,
            });
        }
        Ok(self.range.index_of(host_gsb_coord(kind, coord)))
    }

    /// The connection block of `kind` at `coord`.
    pub fn cb(&self, kind: BlockKind, coord: Coord) -> Result<CbView<'_>, GsbError> {
        let index = self.host_index(kind, coord)?;
        CbView::new(kind, &self.gsbs[index]).ok_or(GsbError::OutOfRange {
            kind,
            x: coord.x,
            y: coord.y,
        })
    }

    /// Mirror table of one tile kind.
    pub fn mirrors(&self, kind: BlockKind) -> &MirrorTable {
        match kind {
            BlockKind::Sb => &self.sb_mirrors,
            BlockKind::CbX => &self.cbx_mirrors,
            BlockKind::CbY => &self.cby_mirrors,
        }
    }

    /// Mutable mirror table of one tile kind, for link maintenance.
    pub fn mirrors_mut(&mut self, kind: BlockKind) -> &mut MirrorTable {
        match kind {
            BlockKind::Sb => &mut self.sb_mirrors,
            BlockKind::CbX => &mut self.cbx_mirrors,
            BlockKind::CbY => &mut self.cby_mirrors,
        }
    }

    /// Unique-module statistics of all three kinds.
    pub fn mirror_stats(&self) -> [MirrorStats; 3] {
        BlockKind::ALL.map(|kind| self.mirrors(kind).stats())
    }

    /// Sets the configuration-bit range of the tile of `kind` at `coord`.
    ///
    /// Mirrors are not updated; call [`assign_mirrors`](Self::assign_mirrors)
    /// once all ranges are set.
    pub fn set_conf_bits(
        &mut self,
        kind: BlockKind,
        coord: Coord,
        bits: ConfBits,
    ) -> Result<(), GsbError> {
        let index = self.host_index(kind, coord)?;
        self.gsbs[index].set_conf_bits(kind, bits);
        Ok(())
    }

    /// Recomputes the mirror tables of every kind from the current tiles.
    pub fn assign_mirrors(&mut self, graph: &RrGraph) {
        self.sb_mirrors = assign_sb_mirrors(graph, self.range, &self.gsbs);
        self.cbx_mirrors = assign_cb_mirrors(graph, self.range, &self.gsbs, BlockKind::CbX);
        self.cby_mirrors = assign_cb_mirrors(graph, self.range, &self.gsbs, BlockKind::CbY);
    }

    /// Validates the single-hop invariant of every mirror table.
    pub fn validate_mirrors(&self) -> Result<(), GsbError> {
        BlockKind::ALL
            .iter()
            .try_for_each(|&kind| self.mirrors(kind).validate())
    }

    /// Distinct segment types used by any switch block, ascending.
    pub fn segment_ids(&self) -> Vec<SegmentId> {
        let mut ids: Vec<_> = self.gsbs.iter().flat_map(RrGsb::segment_ids).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Per-side, per-segment unique submodule counts.
    ///
    /// Sides come in [`Side::ALL`] order and segments in ascending order.
    pub fn side_segment_stats(&self, graph: &RrGraph) -> Vec<SideSegmentStats> {
        let coords: Vec<Coord> = self.range.scan().collect();
        let segments = self.segment_ids();
        let mut stats = Vec::with_capacity(Side::ALL.len() * segments.len());
        for side in Side::ALL {
            for &segment in &segments {
                let table = MirrorTable::assign(
                    BlockKind::Sb,
                    coords.clone(),
                    &self.gsbs,
                    |g| sb_side_segment_signature(g, side, segment),
                    |a, b| sb_side_segment_equivalent(graph, a, b, side, segment),
                );
                let s = table.stats();
                stats.push(SideSegmentStats {
                    side,
                    segment,
                    unique: s.unique,
                    total: s.total,
                });
            }
        }
        stats
    }

    /// Rotated copy of the switch block at `coord`.
    pub fn rotated(&self, coord: Coord, params: RotationParams) -> Result<RotatedGsb, GsbError> {
        Ok(rotate_for_mirror(self.range, self.gsb(coord)?, params))
    }

    /// Rotates every switch block and clusters the rotated forms.
    pub fn rotation_stats(&self, graph: &RrGraph, params: RotationParams) -> RotationStats {
        let rotated: Vec<RotatedGsb> = self
            .gsbs
            .iter()
            .map(|g| rotate_for_mirror(self.range, g, params))
            .collect();
        let table = MirrorTable::assign(
            BlockKind::Sb,
            self.range.scan().collect(),
            &rotated,
            |r| sb_signature(graph, r.as_gsb()),
            |a, b| sb_equivalent(graph, a.as_gsb(), b.as_gsb()),
        );
        let mut wrapped = rotated.iter().filter(|r| r.is_wrapped());
        let first_wrapped = wrapped.next().map(RotatedGsb::coord);
        let stats = table.stats();
        RotationStats {
            unique: stats.unique,
            total: stats.total,
            wrapped_tiles: first_wrapped.map_or(0, |_| 1 + wrapped.count()),
            first_wrapped,
        }
    }
}

fn assign_sb_mirrors(graph: &RrGraph, range: GridRange, gsbs: &[RrGsb]) -> MirrorTable {
    MirrorTable::assign(
        BlockKind::Sb,
        range.scan().collect(),
        gsbs,
        |g| sb_signature(graph, g),
        |a, b| sb_equivalent(graph, a, b),
    )
}

fn assign_cb_mirrors(
    graph: &RrGraph,
    range: GridRange,
    gsbs: &[RrGsb],
    kind: BlockKind,
) -> MirrorTable {
    let coords = block_coords(kind, range);
    let views: Vec<CbView<'_>> = coords
        .iter()
        .filter_map(|&c| CbView::new(kind, &gsbs[range.index_of(host_gsb_coord(kind, c))]))
        .collect();
    MirrorTable::assign(
        kind,
        coords,
        &views,
        |v| cb_signature(graph, v),
        |a, b| cb_equivalent(graph, a, b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_gsb_grid;
    use crate::mirror::MirrorLink;
    use tessel_rrgraph::synth::UniformFabric;

    fn device(nx: usize, ny: usize, width: usize) -> (RrGraph, DeviceRrGsb) {
        let g = UniformFabric::new(nx, ny, width).build();
        let range = GridRange::new(nx, ny);
        let gsbs = build_gsb_grid(&g, range, false).unwrap();
        let d = DeviceRrGsb::new(&g, range, gsbs).unwrap();
        (g, d)
    }

    #[test]
    fn tile_counts() {
        let (_, d) = device(3, 2, 4);
        let [sb, cbx, cby] = d.mirror_stats();
        assert_eq!(sb.total, 12);
        assert_eq!(cbx.total, 3 * 3);
        assert_eq!(cby.total, 4 * 2);
        assert_eq!(sb.unique, 9);
        assert_eq!(cbx.unique, 3);
        assert_eq!(cby.unique, 3);
        assert!(d.validate_mirrors().is_ok());
    }

    #[test]
    fn lookups_check_ranges() {
        let (_, d) = device(2, 2, 4);
        assert!(d.gsb(Coord::new(2, 2)).is_ok());
        assert!(matches!(
            d.gsb(Coord::new(3, 0)),
            Err(GsbError::OutOfRange { kind: BlockKind::Sb, .. })
        ));
        assert!(matches!(
            d.cb(BlockKind::CbX, Coord::new(0, 1)),
            Err(GsbError::OutOfRange { kind: BlockKind::CbX, .. })
        ));
        let cby = d.cb(BlockKind::CbY, Coord::new(1, 2)).unwrap();
        assert_eq!(cby.coord(), Coord::new(1, 2));
        assert_eq!(cby.gsb().coord(), Coord::new(1, 1));
    }

    #[test]
    fn wrong_tile_count_is_internal() {
        let g = UniformFabric::new(2, 2, 4).build();
        let err = DeviceRrGsb::new(&g, GridRange::new(2, 2), Vec::new()).unwrap_err();
        assert!(matches!(err, GsbError::Internal(_)));
    }

    #[test]
    fn conf_bits_split_classes() {
        let (g, mut d) = device(4, 4, 4);
        let before = d.mirrors(BlockKind::CbX).stats().unique;
        d.set_conf_bits(BlockKind::CbX, Coord::new(2, 2), ConfBits::new(0, 9))
            .unwrap();
        // mirrors are stale until reassigned
        assert_eq!(d.mirrors(BlockKind::CbX).stats().unique, before);
        d.assign_mirrors(&g);
        assert_eq!(d.mirrors(BlockKind::CbX).stats().unique, before + 1);
        assert!(d
            .mirrors(BlockKind::CbX)
            .is_canonical(Coord::new(2, 2))
            .unwrap());
        assert_eq!(d.mirrors(BlockKind::Sb).stats().unique, 9);
    }

    #[test]
    fn segment_ids_and_side_stats() {
        let (g, d) = device(3, 3, 4);
        assert_eq!(d.segment_ids(), vec![SegmentId::from_raw(0)]);
        let stats = d.side_segment_stats(&g);
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].side, Side::Top);
        for s in &stats {
            assert_eq!(s.total, 16);
            assert!(s.unique >= 2 && s.unique <= 16, "{s:?}");
        }
    }

    #[test]
    fn rotation_stats_cover_every_tile() {
        let (g, d) = device(4, 4, 8);
        let stats = d.rotation_stats(&g, RotationParams::default());
        assert_eq!(stats.total, 25);
        assert!(stats.unique >= 1 && stats.unique <= stats.total);
        assert_eq!(stats.wrapped_tiles, 0);
        assert!(stats.first_wrapped.is_none());
    }

    #[test]
    fn single_track_subsets_rotate_in_place() {
        // one track per direction: every shift is the identity, only corners change
        let (g, d) = device(4, 4, 2);
        let params = RotationParams::default();
        let stats = d.rotation_stats(&g, params);
        assert_eq!(stats.total, 25);
        assert_eq!(stats.unique, 9);
        assert_eq!(d.mirrors(BlockKind::Sb).stats().unique, 9);
        // top border x = 2, 3; right border y = 2, 3; interior except (1, 1)
        assert_eq!(stats.wrapped_tiles, 12);
        assert_eq!(stats.first_wrapped, Some(Coord::new(1, 2)));

        let shifted = d.rotated(Coord::new(3, 2), params).unwrap();
        let baseline = d.rotated(Coord::new(1, 1), params).unwrap();
        assert!(sb_equivalent(&g, shifted.as_gsb(), baseline.as_gsb()));

        // a swapped corner turns its ports around and stays apart from (0, 0)
        let corner = d.rotated(Coord::new(4, 4), params).unwrap();
        let origin = d.rotated(Coord::new(0, 0), params).unwrap();
        assert_eq!(corner.as_gsb().chan_width(Side::Top), 2);
        assert_eq!(corner.as_gsb().chan_width(Side::Bottom), 0);
        assert!(!sb_equivalent(&g, corner.as_gsb(), origin.as_gsb()));
    }

    #[test]
    fn narrow_channels_report_wraps() {
        let (g, d) = device(3, 3, 2);
        let stats = d.rotation_stats(&g, RotationParams::default());
        assert!(stats.wrapped_tiles > 0);
        assert!(stats.first_wrapped.is_some());
    }

    #[test]
    fn relink_through_device() {
        let (_, mut d) = device(3, 3, 4);
        let table = d.mirrors_mut(BlockKind::Sb);
        assert_eq!(table.link(Coord::new(2, 2)).unwrap(), MirrorLink::MirrorOf(5));
        assert_eq!(table.canonical_of(Coord::new(2, 2)).unwrap(), Coord::new(1, 1));
        table.relink(Coord::new(2, 1), Coord::new(2, 2)).unwrap();
        assert!(d.validate_mirrors().is_ok());
    }
}
