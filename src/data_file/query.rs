use super::{parse_values, Shape};
use anyhow::Result;

pub fn parse_query(content: &str, shape: Shape) -> Result<Vec<f64>> {
    parse_values(
        content,
        Shape {
            rows: 1,
            cols: shape.cols,
        },
    )
}
