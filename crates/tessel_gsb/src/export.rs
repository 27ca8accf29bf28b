//! Per-tile export of switch-block geometry and topology.
//!
//! A [`GsbReport`] is a plain read-out of one tile; nothing in the pipeline
//! depends on it. Reports are written as pretty-printed JSON or as XML text.
//!
//! ```text
//! <rr_gsb x="1" y="1" num_sides="4" rotated="false">
//!   <top chan_type="CHANY" width="4" num_opins="4">
//!     <track index="0" node="97" direction="inc" port="out" segment="0" mux_size="5">
//!       <driver node="120" node_type="CHANX" switch="0" side="right" index="1"/>
//! ```

use crate::device::DeviceRrGsb;
use crate::error::GsbError;
use crate::gsb::{BlockKind, ConfBits, PinRef, PortDirection, RrGsb};
use crate::rotate::RotationParams;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tessel_common::Coord;
use tessel_config::ExportFormat;
use tessel_rrgraph::{Direction, RrGraph, RrNodeId, RrNodeType, SegmentId, Side, SwitchId};

/// One driver of an output track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverReport {
    /// Driving node.
    pub node: RrNodeId,
    /// Its node type.
    pub node_type: RrNodeType,
    /// Switch used by the connection.
    pub switch: SwitchId,
    /// Side of the tile where the driver was found.
    pub side: Option<Side>,
    /// Position on that side.
    pub index: Option<usize>,
}

/// One channel track of a side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackReport {
    /// Track position.
    pub index: usize,
    /// Track node.
    pub node: RrNodeId,
    /// Global direction.
    pub direction: Direction,
    /// Tile-local port direction.
    pub port: PortDirection,
    /// Segment type.
    pub segment: SegmentId,
    /// The track also appears on another side of the tile.
    pub pass_through: bool,
    /// Drivers of an output track; empty for inputs and pass-through tracks.
    pub drivers: Vec<DriverReport>,
}

/// One side of a switch block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideReport {
    /// Side.
    pub side: Side,
    /// Channel axis.
    pub chan_type: RrNodeType,
    /// Tracks in order.
    pub tracks: Vec<TrackReport>,
    /// Output pins feeding the side.
    pub opins: Vec<PinRef>,
    /// Connection-block input pins on the side.
    pub ipins: Vec<PinRef>,
}

/// Geometry and topology of one switch block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GsbReport {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// The tile was rotated before export.
    pub rotated: bool,
    /// Switch-block configuration bits.
    pub sb_conf: ConfBits,
    /// Sides in [`Side::ALL`] order.
    pub sides: Vec<SideReport>,
}

impl GsbReport {
    /// Reads out `gsb`; `rotated` only labels the report.
    pub fn new(graph: &RrGraph, gsb: &RrGsb, rotated: bool) -> Self {
        let sides = Side::ALL
            .iter()
            .map(|&side| side_report(graph, gsb, side))
            .collect();
        Self {
            x: gsb.coord().x,
            y: gsb.coord().y,
            rotated,
            sb_conf: gsb.conf_bits(BlockKind::Sb),
            sides,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, GsbError> {
        serde_json::to_string_pretty(self).map_err(|e| GsbError::Serialize(e.to_string()))
    }

    /// XML text.
    pub fn to_xml(&self) -> String {
        XmlReport(self).to_string()
    }

    /// Renders the report in `format`.
    pub fn render(&self, format: ExportFormat) -> Result<String, GsbError> {
        match format {
            ExportFormat::Json => self.to_json(),
            ExportFormat::Xml => Ok(self.to_xml()),
        }
    }
}

fn side_report(graph: &RrGraph, gsb: &RrGsb, side: Side) -> SideReport {
    let s = gsb.side(side);
    let tracks = (0..s.chan_width())
        .map(|t| {
            let node = s.chan().node(t);
            let pass_through = gsb.is_pass_through(side, t);
            let drivers = if s.port_dir(t) == PortDirection::Out && !pass_through {
                graph
                    .node(node)
                    .drivers
                    .iter()
                    .map(|d| {
                        let node_type = graph.node(d.node).node_type;
                        let loc = gsb.locate(d.node, node_type);
                        DriverReport {
                            node: d.node,
                            node_type,
                            switch: d.switch,
                            side: loc.map(|l| l.side),
                            index: loc.map(|l| l.index),
                        }
                    })
                    .collect()
            } else {
                Vec::new()
            };
            TrackReport {
                index: t,
                node,
                direction: s.chan().direction(t),
                port: s.port_dir(t),
                segment: s.chan().segment(t),
                pass_through,
                drivers,
            }
        })
        .collect();
    SideReport {
        side,
        chan_type: s.chan().node_type(),
        tracks,
        opins: s.opins().to_vec(),
        ipins: s.ipins().to_vec(),
    }
}

struct XmlReport<'a>(&'a GsbReport);

impl fmt::Display for XmlReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(
            f,
            "<rr_gsb x=\"{}\" y=\"{}\" num_sides=\"{}\" rotated=\"{}\">",
            r.x,
            r.y,
            r.sides.len(),
            r.rotated
        )?;
        writeln!(
            f,
            "  <conf_bits lsb=\"{}\" msb=\"{}\"/>",
            r.sb_conf.lsb, r.sb_conf.msb
        )?;
        for s in &r.sides {
            writeln!(
                f,
                "  <{} chan_type=\"{}\" width=\"{}\" num_opins=\"{}\">",
                s.side,
                s.chan_type,
                s.tracks.len(),
                s.opins.len()
            )?;
            for t in &s.tracks {
                write!(
                    f,
                    "    <track index=\"{}\" node=\"{}\" direction=\"{}\" port=\"{}\" segment=\"{}\"",
                    t.index, t.node, t.direction, t.port, t.segment
                )?;
                if t.pass_through {
                    writeln!(f, " pass_through=\"true\"/>")?;
                    continue;
                }
                if t.drivers.is_empty() {
                    writeln!(f, "/>")?;
                    continue;
                }
                writeln!(f, " mux_size=\"{}\">", t.drivers.len())?;
                for d in &t.drivers {
                    write!(
                        f,
                        "      <driver node=\"{}\" node_type=\"{}\" switch=\"{}\"",
                        d.node, d.node_type, d.switch
                    )?;
                    if let (Some(side), Some(index)) = (d.side, d.index) {
                        write!(f, " side=\"{side}\" index=\"{index}\"")?;
                    }
                    writeln!(f, "/>")?;
                }
                writeln!(f, "    </track>")?;
            }
            for pin in &s.opins {
                writeln!(f, "    <opin node=\"{}\" grid_side=\"{}\"/>", pin.node, pin.grid_side)?;
            }
            for pin in &s.ipins {
                writeln!(f, "    <ipin node=\"{}\" grid_side=\"{}\"/>", pin.node, pin.grid_side)?;
            }
            writeln!(f, "  </{}>", s.side)?;
        }
        writeln!(f, "</rr_gsb>")
    }
}

/// File name of the report for the switch block at `coord`.
pub fn report_file_name(coord: Coord, rotated: bool, format: ExportFormat) -> String {
    let prefix = if rotated { "rotated_" } else { "" };
    format!("{prefix}sb_{}__{}_.{}", coord.x, coord.y, format.extension())
}

/// Writes one report per switch block into `dir`, creating it if needed.
///
/// With `rotation` set, a `rotated_` report is also written for every tile.
/// Returns the number of files written.
pub fn write_device_reports(
    dir: &Path,
    graph: &RrGraph,
    device: &DeviceRrGsb,
    format: ExportFormat,
    rotation: Option<RotationParams>,
) -> Result<usize, GsbError> {
    std::fs::create_dir_all(dir)?;
    let mut written = 0;
    for gsb in device.gsbs() {
        let report = GsbReport::new(graph, gsb, false);
        std::fs::write(
            dir.join(report_file_name(gsb.coord(), false, format)),
            report.render(format)?,
        )?;
        written += 1;
    }
    if let Some(params) = rotation {
        for gsb in device.gsbs() {
            let rotated = device.rotated(gsb.coord(), params)?;
            let report = GsbReport::new(graph, rotated.as_gsb(), true);
            std::fs::write(
                dir.join(report_file_name(gsb.coord(), true, format)),
                report.render(format)?,
            )?;
            written += 1;
        }
    }
    Ok(written)
}
