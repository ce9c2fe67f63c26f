use crate::{
    algorithm::{
        bitset::PatternBitset,
        catalog::PatternCatalog,
        selection::{CollapseQueue, neighbor_cell},
        solver::Cell,
    },
    analysis::adjacency::Direction,
    io::error::{Result, invalid_parameter},
    spatial::grid::Point,
};
use ndarray::Array2;
use std::collections::VecDeque;

/// Result of narrowing candidate sets after a collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationOutcome {
    /// Every touched set is still non-empty
    Stable {
        /// Number of times a neighbor's set shrank
        narrowed: usize,
    },
    /// A cell lost its last candidate
    Contradiction {
        /// The emptied cell
        cell: Point,
    },
}

/// Patterns allowed toward `direction` of a cell, given its current state
fn allowed_toward(catalog: &PatternCatalog, cell: &Cell, direction: Direction) -> PatternBitset {
    match cell {
        Cell::Collapsed { pattern } => catalog
            .compatible(*pattern, direction)
            .cloned()
            .unwrap_or_else(|| PatternBitset::new(catalog.len())),
        Cell::Uncollapsed { candidates } => catalog.support(candidates, direction),
    }
}

/// Narrow the candidate sets around `origin` until nothing changes
///
/// Neighbors of a collapsed cell are intersected with the patterns recorded
/// next to its pattern in the matching direction. Any uncollapsed cell whose
/// set shrinks is requeued for selection and in turn restricts its own
/// neighbors to the union of what its remaining candidates allow. Sets only
/// ever lose members.
///
/// # Errors
///
/// Returns an error if `origin` lies outside `cells`
pub fn propagate(
    catalog: &PatternCatalog,
    cells: &mut Array2<Cell>,
    origin: Point,
    queue: &mut CollapseQueue,
) -> Result<PropagationOutcome> {
    if cells.get([origin.y, origin.x]).is_none() {
        return Err(invalid_parameter(
            "origin",
            &format!("({}, {})", origin.x, origin.y),
            &format!("outside the {}x{} cell grid", cells.ncols(), cells.nrows()),
        ));
    }

    let mut pending = VecDeque::from([origin]);
    let mut narrowed = 0;

    while let Some(current) = pending.pop_front() {
        let Some(current_cell) = cells.get([current.y, current.x]) else {
            continue;
        };

        let constraints: Vec<(Point, PatternBitset)> = Direction::ALL
            .iter()
            .filter_map(|&direction| {
                let neighbor = neighbor_cell(cells, current, direction)?;
                match cells.get([neighbor.y, neighbor.x]) {
                    Some(Cell::Uncollapsed { .. }) => Some((
                        neighbor,
                        allowed_toward(catalog, current_cell, direction),
                    )),
                    _ => None,
                }
            })
            .collect();

        for (neighbor, allowed) in constraints {
            let Some(Cell::Uncollapsed { candidates }) = cells.get_mut([neighbor.y, neighbor.x])
            else {
                continue;
            };

            if !candidates.intersect_with(&allowed) {
                continue;
            }
            if candidates.is_empty() {
                return Ok(PropagationOutcome::Contradiction { cell: neighbor });
            }

            narrowed += 1;
            queue.push(neighbor, candidates.count());
            pending.push_back(neighbor);
        }
    }

    Ok(PropagationOutcome::Stable { narrowed })
}
