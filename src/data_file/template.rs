use super::{parse_values, Shape};
use anyhow::Result;

pub fn parse_template(content: &str, shape: Shape) -> Result<Vec<Vec<f64>>> {
    let values = parse_values(content, shape)?;
    let rows = values
        .chunks_exact(shape.cols)
        .map(|row| row.to_vec())
        .collect::<Vec<_>>();
    Ok(rows)
}
