use std::cmp::Ordering;

pub const NEIGHBOR_COUNT: usize = 10;

/// One scored template row. `row` is 1-based.
#[derive(Copy, Clone, Debug)]
pub struct Matched {
    pub row: usize,
    pub similarity: f64,
}

// Ascending by similarity, equal similarities ascending by row. Reading the
// ascending order backwards puts the highest-index row first among ties.
impl PartialOrd for Matched {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Matched {
    fn cmp(&self, other: &Self) -> Ordering {
        self.similarity
            .total_cmp(&other.similarity)
            .then(self.row.cmp(&other.row))
    }
}

impl PartialEq for Matched {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Matched {}

/// Scores `query` against every row of `template` and keeps the `n` best,
/// highest similarity first.
pub fn match_top_n(query: &[f64], template: &[Vec<f64>], n: usize) -> Vec<Matched> {
    let mut matched = template
        .iter()
        .enumerate()
        .map(|(index, row)| Matched {
            row: index + 1,
            similarity: cosine_similarity(query, row),
        })
        .collect::<Vec<_>>();
    matched.sort_unstable_by(|a, b| b.cmp(a));
    matched.truncate(n);
    debug!("top_n: {:?}", matched);

    matched
}

fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn magnitude(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

fn max_abs(a: &[f64]) -> f64 {
    a.iter().fold(0.0, |max, x| max.max(x.abs()))
}

fn scaled(a: &[f64], by: f64) -> Vec<f64> {
    a.iter().map(|x| x / by).collect()
}

/// Cosine similarity of two equal-length vectors. A zero vector has no
/// direction, so its similarity to anything is 0.
///
/// Both vectors are divided by their largest absolute component first, so
/// every sum stays within `len` and large inputs cannot overflow.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let max_a = max_abs(a);
    let max_b = max_abs(b);
    if max_a == 0.0 || max_b == 0.0 {
        return 0.0;
    }
    let a = scaled(a, max_a);
    let b = scaled(b, max_b);

    let dot = dot_product(&a, &b);
    let mag_a = magnitude(&a);
    let mag_b = magnitude(&b);

    // -0.0 and 0.0 rank as one similarity
    dot / (mag_a * mag_b) + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn rows(matched: &[Matched]) -> Vec<usize> {
        matched.iter().map(|m| m.row).collect()
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = [1.0, -2.0, 3.5, 0.0];
        let b = [0.5, 4.0, -1.0, 2.0];
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn cosine_with_itself_is_one() {
        let a = [0.3, 1.7, -4.2, 9.9, 0.01];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn cosine_is_bounded() {
        let vectors = [
            vec![1.0, 0.0, 0.0],
            vec![-1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![1e-300, 1e-300, 1e-300],
            vec![1e150, -1e150, 3.0],
            vec![2.0, 2.0, -7.0],
        ];
        for a in vectors.iter() {
            for b in vectors.iter() {
                let sim = cosine_similarity(a, b);
                assert!(
                    (-1.0 - EPSILON..=1.0 + EPSILON).contains(&sim),
                    "similarity {} out of range for {:?} and {:?}",
                    sim,
                    a,
                    b
                );
            }
        }
        assert!((cosine_similarity(&vectors[0], &vectors[1]) + 1.0).abs() < EPSILON);
        assert!(cosine_similarity(&vectors[0], &vectors[2]).abs() < EPSILON);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        let zero = [0.0; 4];
        let a = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(cosine_similarity(&zero, &a), 0.0);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn top_n_is_sorted_descending() {
        let query = vec![1.0, 0.0];
        let template = (0..20)
            .map(|i| {
                let angle = i as f64 * 0.15;
                vec![angle.cos(), angle.sin()]
            })
            .rev()
            .collect::<Vec<_>>();
        let matched = match_top_n(&query, &template, NEIGHBOR_COUNT);
        assert_eq!(matched.len(), NEIGHBOR_COUNT);
        for pair in matched.windows(2) {
            assert!(pair[0].similarity > pair[1].similarity);
        }
        // rows were reversed, so the smallest angle is the last row
        assert_eq!(rows(&matched), (11..=20).rev().collect::<Vec<_>>());
    }

    #[test]
    fn top_n_breaks_ties_by_higher_row_first() {
        let query = vec![1.0, 1.0];
        let template = vec![
            vec![2.0, 2.0],
            vec![1.0, 0.0],
            vec![2.0, 2.0],
            vec![0.0, 1.0],
            vec![2.0, 2.0],
        ];
        let matched = match_top_n(&query, &template, 4);
        assert_eq!(rows(&matched), vec![5, 3, 1, 4]);

        // orthogonal rows tie whatever the sign of their zero dot product
        let query = vec![1.0, 0.0];
        let template = vec![vec![0.0, 5.0], vec![-0.0, -5.0]];
        let matched = match_top_n(&query, &template, 2);
        assert_eq!(rows(&matched), vec![2, 1]);
        assert!(matched.iter().all(|m| m.similarity.is_sign_positive()));
    }

    #[test]
    fn cosine_of_huge_values_stays_finite() {
        let query = [1e200, 1e200];
        let sim = cosine_similarity(&query, &[1e200, 1e200]);
        assert!((sim - 1.0).abs() < EPSILON);
        let sim = cosine_similarity(&[f64::MAX, -f64::MAX], &[1.0, -1.0]);
        assert!((sim - 1.0).abs() < EPSILON);

        let template = vec![vec![1.0, 0.0], vec![1e200, 1e200], vec![1.0, 1.0]];
        let matched = match_top_n(&query, &template, 3);
        assert!(matched.iter().all(|m| m.similarity.is_finite()));
        assert_eq!(rows(&matched), vec![3, 2, 1]);
        assert!((matched[0].similarity - 1.0).abs() < EPSILON);
        assert!((matched[2].similarity - std::f64::consts::FRAC_1_SQRT_2).abs() < EPSILON);
    }

    #[test]
    fn cosine_of_tiny_values_keeps_direction() {
        let a = [1e-300, 1e-300, 1e-300];
        assert!((cosine_similarity(&a, &[1.0, 1.0, 1.0]) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn top_n_with_fewer_candidates() {
        let query = vec![1.0];
        let template = vec![vec![1.0], vec![-1.0], vec![2.0]];
        let matched = match_top_n(&query, &template, NEIGHBOR_COUNT);
        assert_eq!(rows(&matched), vec![3, 1, 2]);
    }

    #[test]
    fn single_matching_row_leads_zero_rows() {
        let query = vec![1.0; 8];
        let template = (1..=138)
            .map(|row| if row == 5 { vec![1.0; 8] } else { vec![0.0; 8] })
            .collect::<Vec<_>>();
        let matched = match_top_n(&query, &template, NEIGHBOR_COUNT);
        assert_eq!(matched[0].row, 5);
        assert!((matched[0].similarity - 1.0).abs() < EPSILON);
        assert!(matched[1..].iter().all(|m| m.similarity == 0.0));
        assert_eq!(
            rows(&matched),
            vec![5, 138, 137, 136, 135, 134, 133, 132, 131, 130]
        );
    }
}
