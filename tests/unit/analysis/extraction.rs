//! Tests for the extraction scan: canonicalization, neighbor windows and boundaries

#[cfg(test)]
mod tests {
    use tilecollapse::analysis::adjacency::Direction;
    use tilecollapse::analysis::extraction::{Extractor, extract_patterns};
    use tilecollapse::spatial::grid::{Color, PixelGrid, Point};
    use tilecollapse::spatial::tiles::Region;
    use tilecollapse::{AlgorithmError, Result};

    fn palette(symbol: char) -> Color {
        match symbol {
            'a' => Color::new(220, 40, 40),
            'b' => Color::new(40, 220, 40),
            'c' => Color::new(40, 40, 220),
            'd' => Color::new(220, 220, 40),
            _ => Color::new(0, 0, 0),
        }
    }

    fn grid_from_rows(rows: &[&str]) -> Result<PixelGrid> {
        let width = rows.first().map_or(0, |row| row.len());
        let pixels = rows.iter().flat_map(|row| row.chars().map(palette)).collect();
        PixelGrid::new(width, rows.len(), pixels)
    }

    fn four_blocks() -> Result<PixelGrid> {
        grid_from_rows(&[
            "aaabbb", "aaabbb", "aaabbb", "cccddd", "cccddd", "cccddd",
        ])
    }

    fn checkerboard(size: usize) -> Result<PixelGrid> {
        PixelGrid::from_fn(size, size, |p| {
            if (p.x + p.y) % 2 == 0 {
                palette('a')
            } else {
                palette('b')
            }
        })
    }

    // Tests region sizes outside the image are rejected
    // Verified by removing the dimension check in Extractor::new
    #[test]
    fn test_invalid_region_size() -> Result<()> {
        let source = four_blocks()?;
        assert!(matches!(
            Extractor::new(&source, 0),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
        assert!(matches!(
            extract_patterns(&source, 7),
            Err(AlgorithmError::InvalidParameter { .. })
        ));
        Ok(())
    }

    // Tests every canonical point maps back to itself
    // Verified by recording the neighbor origin instead of its canonical point
    #[test]
    fn test_canonicalization_idempotent() -> Result<()> {
        let source = checkerboard(7)?;
        let model = extract_patterns(&source, 3)?;

        for point in model.patterns().canonical_points() {
            let region = Region::extract(&source, point, 3)?;
            assert_eq!(model.patterns().get(&region), Some(point));
        }
        for y in 0..=4 {
            for x in 0..=4 {
                let region = Region::extract(&source, Point::new(x, y), 3)?;
                let canonical = model.patterns().get(&region);
                assert!(canonical.is_some_and(|c| model.adjacency().get(c).is_some()));
            }
        }
        Ok(())
    }

    // Tests distinct solid blocks are their own patterns with single-step neighbors
    // Verified by stepping one pixel instead of one region width
    #[test]
    fn test_four_blocks_neighbors() -> Result<()> {
        let source = four_blocks()?;
        let model = extract_patterns(&source, 3)?;
        let corners = [
            Point::new(0, 0),
            Point::new(3, 0),
            Point::new(0, 3),
            Point::new(3, 3),
        ];

        for corner in corners {
            let region = Region::extract(&source, corner, 3)?;
            assert_eq!(model.patterns().get(&region), Some(corner));
        }

        let top_left = model.adjacency().get(Point::new(0, 0));
        assert_eq!(
            top_left.map(|n| n.get(Direction::Right).to_vec()),
            Some(vec![Point::new(3, 0)])
        );
        assert_eq!(
            top_left.map(|n| n.get(Direction::Down).to_vec()),
            Some(vec![Point::new(0, 3)])
        );
        assert_eq!(top_left.map(|n| n.get(Direction::Up).len()), Some(0));
        assert_eq!(top_left.map(|n| n.get(Direction::Left).len()), Some(0));

        let bottom_right = model.adjacency().get(Point::new(3, 3));
        assert_eq!(
            bottom_right.map(|n| n.get(Direction::Up).to_vec()),
            Some(vec![Point::new(3, 0)])
        );
        assert_eq!(
            bottom_right.map(|n| n.get(Direction::Left).to_vec()),
            Some(vec![Point::new(0, 3)])
        );
        Ok(())
    }

    // Tests a two-color checkerboard yields two patterns that only border each other
    // Verified by deduplicating neighbor lists on record
    #[test]
    fn test_checkerboard_alternates() -> Result<()> {
        let source = checkerboard(6)?;
        let model = extract_patterns(&source, 3)?;
        let dark = Point::new(0, 0);
        let light = Point::new(0, 3);

        assert_eq!(model.patterns().len(), 2);
        assert_eq!(model.adjacency().patterns(), vec![dark, light]);

        let far_corner = Region::extract(&source, Point::new(3, 3), 3)?;
        assert_eq!(model.patterns().get(&far_corner), Some(dark));

        let dark_lists = model.adjacency().get(dark);
        for direction in Direction::ALL {
            assert_eq!(
                dark_lists.map(|n| n.multiplicity(direction, light)),
                Some(2),
                "{direction:?}"
            );
            assert_eq!(dark_lists.map(|n| n.multiplicity(direction, dark)), Some(0));
        }
        Ok(())
    }

    // Tests an image exactly one region wide records no neighbors
    // Verified by wrapping neighbor windows around the image edge
    #[test]
    fn test_single_region_boundary() -> Result<()> {
        let source = grid_from_rows(&["abc", "bcd", "cda"])?;
        let model = extract_patterns(&source, 3)?;

        assert_eq!(model.patterns().len(), 1);
        assert_eq!(model.adjacency().len(), 1);
        assert_eq!(model.adjacency().observation_count(), 0);
        assert_eq!(model.region_size(), 3);
        Ok(())
    }

    // Tests horizontal and vertical observations mirror each other
    // Verified by recording Left observations under Right
    #[test]
    fn test_observations_symmetric() -> Result<()> {
        let source = grid_from_rows(&[
            "aabbcc", "abcabc", "ccbbaa", "dabcda", "aaddbb", "bcadcb",
        ])?;
        let model = extract_patterns(&source, 2)?;
        let adjacency = model.adjacency();

        for pattern in adjacency.patterns() {
            for direction in Direction::ALL {
                let Some(lists) = adjacency.get(pattern) else {
                    unreachable!("pattern listed without an entry");
                };
                for &neighbor in lists.get(direction) {
                    let back = adjacency
                        .get(neighbor)
                        .map_or(0, |n| n.multiplicity(direction.opposite(), pattern));
                    assert!(back > 0, "{pattern:?} -> {neighbor:?} has no reverse");
                }
            }
        }
        Ok(())
    }
}
