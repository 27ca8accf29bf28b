//! The mirror registry: a canonical/derivative partition of one tile kind.
//!
//! Tiles are visited in a fixed scan order. Each tile is compared with the
//! canonical representatives found so far, in discovery order, and links to
//! the first one it matches; a tile matching none becomes a new
//! representative. Links always name a canonical entry directly, so a lookup
//! never walks a chain.

use crate::error::GsbError;
use crate::gsb::BlockKind;
use serde::Serialize;
use std::collections::HashMap;
use tessel_common::{ContentHash, Coord};

/// Mirror status of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorLink {
    /// The tile is the representative of its class.
    Canonical,
    /// The tile mirrors the entry at this table position.
    MirrorOf(usize),
}

/// Unique-module statistics of one tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    /// Tile kind.
    pub kind: BlockKind,
    /// Number of canonical representatives.
    pub unique: usize,
    /// Number of tiles.
    pub total: usize,
}

/// Mirror links of every tile of one kind, in scan order.
#[derive(Debug, Clone)]
pub struct MirrorTable {
    kind: BlockKind,
    coords: Vec<Coord>,
    links: Vec<MirrorLink>,
    /// Table positions of canonical entries, ascending.
    representatives: Vec<usize>,
    positions: HashMap<Coord, usize>,
}

impl MirrorTable {
    /// Partitions `items` (one per entry of `coords`) into equivalence classes.
    ///
    /// `signature` must give equal values for items that `equivalent` accepts;
    /// it only prunes comparisons and never changes which representative wins.
    pub fn assign<T>(
        kind: BlockKind,
        coords: Vec<Coord>,
        items: &[T],
        signature: impl Fn(&T) -> ContentHash,
        equivalent: impl Fn(&T, &T) -> bool,
    ) -> Self {
        debug_assert_eq!(coords.len(), items.len());
        let mut links = Vec::with_capacity(items.len());
        let mut reps: Vec<(usize, ContentHash)> = Vec::new();
        for (i, item) in items.iter().enumerate() {
            let sig = signature(item);
            let found = reps
                .iter()
                .find(|&&(rep, rep_sig)| rep_sig == sig && equivalent(&items[rep], item))
                .map(|&(rep, _)| rep);
            match found {
                Some(rep) => links.push(MirrorLink::MirrorOf(rep)),
                None => {
                    reps.push((i, sig));
                    links.push(MirrorLink::Canonical);
                }
            }
        }
        let positions = coords.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            kind,
            coords,
            links,
            representatives: reps.into_iter().map(|(i, _)| i).collect(),
            positions,
        }
    }

    /// Tile kind of this table.
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Returns `true` for a table without tiles.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates in scan order.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    fn position(&self, coord: Coord) -> Result<usize, GsbError> {
        self.positions
            .get(&coord)
            .copied()
            .ok_or(GsbError::OutOfRange {
                kind: self.kind,
                x: coord.x,
                y: coord.y,
            })
    }

    /// Mirror link of the tile at `coord`.
    pub fn link(&self, coord: Coord) -> Result<MirrorLink, GsbError> {
        Ok(self.links[self.position(coord)?])
    }

    /// Coordinate of the representative of the class containing `coord`.
    pub fn canonical_of(&self, coord: Coord) -> Result<Coord, GsbError> {
        Ok(match self.link(coord)? {
            MirrorLink::Canonical => coord,
            MirrorLink::MirrorOf(rep) => self.coords[rep],
        })
    }

    /// Returns `true` if the tile at `coord` is a representative.
    pub fn is_canonical(&self, coord: Coord) -> Result<bool, GsbError> {
        Ok(self.link(coord)? == MirrorLink::Canonical)
    }

    /// Canonical representatives, in discovery order.
    pub fn representatives(&self) -> impl Iterator<Item = Coord> + '_ {
        self.representatives.iter().map(|&i| self.coords[i])
    }

    /// Every tile whose class is represented by `rep`, the representative included.
    pub fn members(&self, rep: Coord) -> Result<Vec<Coord>, GsbError> {
        let rep_pos = self.position(rep)?;
        Ok(self
            .links
            .iter()
            .enumerate()
            .filter(|&(i, link)| i == rep_pos || *link == MirrorLink::MirrorOf(rep_pos))
            .map(|(i, _)| self.coords[i])
            .collect())
    }

    /// Unique-versus-total statistics.
    pub fn stats(&self) -> MirrorStats {
        MirrorStats {
            kind: self.kind,
            unique: self.representatives.len(),
            total: self.coords.len(),
        }
    }

    /// Checks that every mirror links directly to a canonical entry.
    ///
    /// A chain means some code rewrote links incorrectly; it is reported, never
    /// repaired.
    pub fn validate(&self) -> Result<(), GsbError> {
        for (i, link) in self.links.iter().enumerate() {
            if let MirrorLink::MirrorOf(target) = *link {
                if self.links[target] != MirrorLink::Canonical {
                    let (from, to) = (self.coords[i], self.coords[target]);
                    return Err(GsbError::MirrorChain {
                        kind: self.kind,
                        x: from.x,
                        y: from.y,
                        target_x: to.x,
                        target_y: to.y,
                    });
                }
            }
        }
        Ok(())
    }

    /// Re-points the tile at `coord` to the class of `target`, then validates.
    ///
    /// The target is resolved to its representative before linking, so a tile
    /// pointed at its own class keeps its current link; only a representative
    /// pointed at itself stays canonical. If `coord` was a representative
    /// with mirrors of its own, those mirrors now form chains and validation
    /// fails; the table keeps the rewritten link either way.
    pub fn relink(&mut self, coord: Coord, target: Coord) -> Result<(), GsbError> {
        let pos = self.position(coord)?;
        let target_pos = self.position(self.canonical_of(target)?)?;
        self.links[pos] = if target_pos == pos {
            MirrorLink::Canonical
        } else {
            MirrorLink::MirrorOf(target_pos)
        };
        match (self.links[pos], self.representatives.binary_search(&pos)) {
            (MirrorLink::Canonical, Err(at)) => self.representatives.insert(at, pos),
            (MirrorLink::MirrorOf(_), Ok(at)) => {
                self.representatives.remove(at);
            }
            _ => {}
        }
        self.validate()
    }
}
