use std::collections::HashSet;

use crate::{
    foundation::{
        core::{ColorTag, PieceId, Point},
        error::JigsawResult,
        rng::Rng64,
    },
    piece::model::Piece,
    puzzle::config::PuzzleConfig,
};

/// Cut the board into `rows x columns` pieces in grid order (row-major).
///
/// Every piece starts at its correct position, placed, with flat edges. Deterministic for a
/// given config.
#[tracing::instrument(skip(config), fields(rows = config.rows, columns = config.columns))]
pub fn partition(config: &PuzzleConfig) -> JigsawResult<Vec<Piece>> {
    config.validate()?;

    let rows = f64::from(config.rows);
    let columns = f64::from(config.columns);
    let size = config.piece_size();

    let mut pieces = Vec::with_capacity(config.piece_count());
    for row in 0..config.rows {
        for col in 0..config.columns {
            let correct = Point::new(
                config.board_x + config.board_width * f64::from(col) / columns,
                config.board_y + config.board_height * f64::from(row) / rows,
            );
            pieces.push(Piece::new(PieceId::new(row, col), correct, size));
        }
    }
    Ok(pieces)
}

/// Give every piece a random colour, unique within the slice.
pub fn assign_color_tags(pieces: &mut [Piece], rng: &mut Rng64) {
    let mut used = HashSet::with_capacity(pieces.len());
    for piece in pieces.iter_mut() {
        let mut color = random_color(rng);
        while !used.insert(color) {
            color = random_color(rng);
        }
        piece.color = color;
    }
}

fn random_color(rng: &mut Rng64) -> ColorTag {
    ColorTag::rgb(rng.next_u8(), rng.next_u8(), rng.next_u8())
}

#[cfg(test)]
#[path = "../../tests/unit/puzzle/grid.rs"]
mod tests;
