use crate::{
    algorithm::solver::SolvedGrid,
    io::error::{AlgorithmError, Result, allocation_failure, invalid_parameter},
    spatial::grid::{PixelGrid, Point},
};

/// Render a solved grid by stamping each cell's source block
///
/// Cell `(cx, cy)` covers output pixels starting at
/// `(cx * region_size, cy * region_size)` and copies the `region_size` square
/// of `source` whose top-left corner is the cell's canonical point.
///
/// # Errors
///
/// Returns an error if `region_size` is zero, the output dimensions overflow,
/// or a canonical point's block does not fit inside `source`
pub fn composite(
    solution: &SolvedGrid,
    source: &PixelGrid,
    region_size: usize,
) -> Result<PixelGrid> {
    if region_size == 0 {
        return Err(invalid_parameter(
            "region_size",
            &region_size,
            &"must be positive",
        ));
    }

    if let Some((_, pattern)) = solution
        .iter()
        .find(|&(_, pattern)| !source.contains_block(pattern, region_size))
    {
        return Err(AlgorithmError::InvalidPatternReference { pattern });
    }

    let width = solution
        .width()
        .checked_mul(region_size)
        .ok_or_else(|| allocation_failure("composite output", usize::MAX))?;
    let height = solution
        .height()
        .checked_mul(region_size)
        .ok_or_else(|| allocation_failure("composite output", usize::MAX))?;

    PixelGrid::from_fn(width, height, |pixel| {
        let cell = Point::new(pixel.x / region_size, pixel.y / region_size);
        solution
            .get(cell)
            .and_then(|origin| {
                source.get(Point::new(
                    origin.x + pixel.x % region_size,
                    origin.y + pixel.y % region_size,
                ))
            })
            .unwrap_or_default()
    })
}
