use std::collections::HashMap;

use crate::{
    foundation::{
        core::PieceId,
        error::{JigsawError, JigsawResult},
        rng::Rng64,
    },
    piece::model::Piece,
    puzzle::config::PuzzleConfig,
};

/// Smallest tab offset along an edge, as a fraction of the edge length.
pub const TAB_POSITION_MIN: f64 = 0.3;
/// Largest tab offset along an edge, as a fraction of the edge length.
pub const TAB_POSITION_MAX: f64 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
/// Signed edge parameter of an interior boundary.
///
/// The magnitude (in `[0.3, 0.7]`) is where the tab sits along the edge; the sign is the
/// protrusion direction: positive bulges out of the piece, negative is a socket.
pub struct Tab(f64);

impl Tab {
    pub fn new(value: f64) -> JigsawResult<Self> {
        let m = value.abs();
        if !(TAB_POSITION_MIN..=TAB_POSITION_MAX).contains(&m) {
            return Err(JigsawError::validation(format!(
                "tab parameter {value} outside ±[{TAB_POSITION_MIN}, {TAB_POSITION_MAX}]"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Fraction along the edge where the tab is centered.
    pub fn position(self) -> f64 {
        self.0.abs()
    }

    pub fn is_outward(self) -> bool {
        self.0 > 0.0
    }

    /// `1.0` for an outward tab, `-1.0` for a socket.
    pub fn direction(self) -> f64 {
        self.0.signum()
    }

    /// Draw one boundary: uniform position, independent fair sign.
    pub fn random(rng: &mut Rng64) -> Self {
        let magnitude = rng.range(TAB_POSITION_MIN, TAB_POSITION_MAX);
        if rng.coin() {
            Self(magnitude)
        } else {
            Self(-magnitude)
        }
    }
}

impl std::ops::Neg for Tab {
    type Output = Tab;

    fn neg(self) -> Tab {
        Tab(-self.0)
    }
}

impl TryFrom<f64> for Tab {
    type Error = JigsawError;

    fn try_from(value: f64) -> JigsawResult<Self> {
        Tab::new(value)
    }
}

impl From<Tab> for f64 {
    fn from(tab: Tab) -> f64 {
        tab.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Outline traversal order.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Grid neighbor across this side, if it exists.
    pub fn neighbor(self, id: PieceId, rows: u32, columns: u32) -> Option<PieceId> {
        match self {
            Side::Top if id.row > 0 => Some(PieceId::new(id.row - 1, id.col)),
            Side::Right if id.col + 1 < columns => Some(PieceId::new(id.row, id.col + 1)),
            Side::Bottom if id.row + 1 < rows => Some(PieceId::new(id.row + 1, id.col)),
            Side::Left if id.col > 0 => Some(PieceId::new(id.row, id.col - 1)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// The four edge parameters of a piece. `None` is a flat perimeter edge.
pub struct Edges {
    pub top: Option<Tab>,
    pub right: Option<Tab>,
    pub bottom: Option<Tab>,
    pub left: Option<Tab>,
}

impl Edges {
    pub fn get(&self, side: Side) -> Option<Tab> {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }

    pub fn set(&mut self, side: Side, tab: Option<Tab>) {
        match side {
            Side::Top => self.top = tab,
            Side::Right => self.right = tab,
            Side::Bottom => self.bottom = tab,
            Side::Left => self.left = tab,
        }
    }
}

/// Assign mirrored tabs to every interior boundary of the grid.
///
/// Pieces are located by their `(row, col)` id, not by slice position, so the slice may be in
/// any order (e.g. z-order). Each boundary is drawn once, from the piece on its left/top, and
/// written to both neighbors; perimeter edges are reset to `None`.
pub fn assign_edges(
    pieces: &mut [Piece],
    config: &PuzzleConfig,
    rng: &mut Rng64,
) -> JigsawResult<()> {
    config.validate()?;
    if pieces.len() != config.piece_count() {
        return Err(JigsawError::validation(format!(
            "expected {} pieces for a {}x{} grid, got {}",
            config.piece_count(),
            config.rows,
            config.columns,
            pieces.len()
        )));
    }

    let mut slot_of = HashMap::<PieceId, usize>::with_capacity(pieces.len());
    for (slot, piece) in pieces.iter().enumerate() {
        let id = piece.id;
        if id.row >= config.rows || id.col >= config.columns {
            return Err(JigsawError::validation(format!(
                "piece {id} lies outside the {}x{} grid",
                config.rows, config.columns
            )));
        }
        if slot_of.insert(id, slot).is_some() {
            return Err(JigsawError::validation(format!("duplicate piece {id}")));
        }
    }

    for piece in pieces.iter_mut() {
        piece.edges = Edges::default();
    }

    for row in 0..config.rows {
        for col in 0..config.columns {
            let id = PieceId::new(row, col);
            for side in [Side::Right, Side::Bottom] {
                let Some(neighbor) = side.neighbor(id, config.rows, config.columns) else {
                    continue;
                };
                let tab = Tab::random(rng);
                pieces[slot_of[&id]].edges.set(side, Some(tab));
                pieces[slot_of[&neighbor]]
                    .edges
                    .set(side.opposite(), Some(-tab));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/puzzle/edges.rs"]
mod tests;
