//! Tests for transitive narrowing of candidate sets after a collapse

#[cfg(test)]
mod tests {
    use ndarray::Array2;
    use tilecollapse::{AlgorithmError, Result};
    use tilecollapse::algorithm::bitset::PatternBitset;
    use tilecollapse::algorithm::catalog::PatternCatalog;
    use tilecollapse::algorithm::propagation::{PropagationOutcome, propagate};
    use tilecollapse::algorithm::selection::CollapseQueue;
    use tilecollapse::algorithm::solver::Cell;
    use tilecollapse::analysis::adjacency::{AdjacencyIndex, Direction, Neighbors};
    use tilecollapse::spatial::grid::Point;

    fn catalog_from(links: &[(Point, Direction, Point)], patterns: &[Point]) -> Result<PatternCatalog> {
        let mut index = AdjacencyIndex::new()?;
        for &pattern in patterns {
            index.set(pattern, Neighbors::new())?;
        }
        for &(from, direction, to) in links {
            let mut observed = Neighbors::new();
            observed.push(direction, to)?;
            index.record(from, observed)?;
        }
        PatternCatalog::from_adjacency(&index)
    }

    // Patterns 0, 1, 2 in a horizontal strip with mirrored links
    fn strip_catalog() -> Result<PatternCatalog> {
        let (p0, p1, p2) = (Point::new(0, 0), Point::new(1, 0), Point::new(2, 0));
        catalog_from(
            &[
                (p0, Direction::Right, p1),
                (p0, Direction::Right, p2),
                (p1, Direction::Left, p0),
                (p2, Direction::Left, p0),
                (p1, Direction::Right, p2),
                (p2, Direction::Left, p1),
                (p2, Direction::Right, p0),
                (p0, Direction::Left, p2),
            ],
            &[p0, p1, p2],
        )
    }

    fn grid(width: usize, catalog: &PatternCatalog) -> Array2<Cell> {
        Array2::from_elem(
            (1, width),
            Cell::Uncollapsed {
                candidates: catalog.full_set(),
            },
        )
    }

    fn candidates_at(cells: &Array2<Cell>, x: usize) -> Option<Vec<usize>> {
        match cells.get([0, x]) {
            Some(Cell::Uncollapsed { candidates }) => Some(candidates.to_vec()),
            _ => None,
        }
    }

    // Tests restrictions travel past the collapsed cell's direct neighbors
    // Verified by not requeueing narrowed cells
    #[test]
    fn test_transitive_narrowing() -> Result<()> {
        let catalog = strip_catalog()?;
        let mut cells = grid(3, &catalog);
        let mut queue = CollapseQueue::new();
        if let Some(slot) = cells.get_mut([0, 0]) {
            *slot = Cell::Collapsed { pattern: 0 };
        }

        let outcome = propagate(&catalog, &mut cells, Point::new(0, 0), &mut queue)?;

        assert_eq!(outcome, PropagationOutcome::Stable { narrowed: 2 });
        assert_eq!(candidates_at(&cells, 1), Some(vec![1, 2]));
        assert_eq!(candidates_at(&cells, 2), Some(vec![0, 2]));
        assert_eq!(queue.pop_min(&cells), Some(Point::new(1, 0)));
        Ok(())
    }

    // Tests an emptied set reports the offending cell
    // Verified by skipping the emptiness check
    #[test]
    fn test_contradiction_reported() -> Result<()> {
        let (p0, p1) = (Point::new(0, 0), Point::new(1, 0));
        let catalog = catalog_from(
            &[(p0, Direction::Right, p1), (p1, Direction::Left, p0)],
            &[p0, p1],
        )?;
        let mut cells = grid(3, &catalog);
        let mut queue = CollapseQueue::new();
        if let Some(slot) = cells.get_mut([0, 0]) {
            *slot = Cell::Collapsed { pattern: 0 };
        }

        let outcome = propagate(&catalog, &mut cells, Point::new(0, 0), &mut queue)?;

        assert_eq!(
            outcome,
            PropagationOutcome::Contradiction {
                cell: Point::new(2, 0)
            }
        );
        Ok(())
    }

    // Tests sets only lose members and collapsed cells are left alone
    // Verified by assigning the allowed set instead of intersecting
    #[test]
    fn test_monotone_shrinking() -> Result<()> {
        let catalog = strip_catalog()?;
        let mut cells = grid(4, &catalog);
        let mut queue = CollapseQueue::new();
        let mut narrowed = PatternBitset::new(3);
        narrowed.insert(2);
        if let Some(slot) = cells.get_mut([0, 3]) {
            *slot = Cell::Uncollapsed { candidates: narrowed };
        }
        if let Some(slot) = cells.get_mut([0, 1]) {
            *slot = Cell::Collapsed { pattern: 0 };
        }
        let before = cells.clone();

        let outcome = propagate(&catalog, &mut cells, Point::new(1, 0), &mut queue)?;

        assert!(matches!(outcome, PropagationOutcome::Stable { .. }));
        assert_eq!(cells.get([0, 1]), before.get([0, 1]));
        for (after, prior) in cells.iter().zip(before.iter()) {
            if let (
                Cell::Uncollapsed { candidates: now },
                Cell::Uncollapsed { candidates: then },
            ) = (after, prior)
            {
                assert!(now.is_subset(then));
            }
        }
        assert_eq!(candidates_at(&cells, 0), Some(vec![2]));
        Ok(())
    }

    // Tests an origin outside the grid is refused instead of reported stable
    // Verified by skipping origins with no cell
    #[test]
    fn test_origin_outside_grid() -> Result<()> {
        let catalog = strip_catalog()?;
        let mut cells = grid(4, &catalog);
        let mut queue = CollapseQueue::new();
        let before = cells.clone();

        assert!(matches!(
            propagate(&catalog, &mut cells, Point::new(0, 1), &mut queue),
            Err(AlgorithmError::InvalidParameter {
                parameter: "origin",
                ..
            })
        ));
        assert_eq!(cells, before);
        assert!(queue.is_empty());
        Ok(())
    }
}
