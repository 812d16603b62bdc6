use nalgebra::DMatrix;

/// Strict row diagonal dominance: `|a_ii| > sum_{j != i} |a_ij|` for every row.
///
/// An empty matrix stands for "no matrix" and is never dominant, neither is a
/// non-square one.
pub fn is_diagonally_dominant(matrix: &DMatrix<f64>) -> bool {
    match dominance_margins(matrix) {
        Some(margins) => margins.iter().all(|margin| *margin > 0.0),
        None => false,
    }
}

/// Per-row slack `|a_ii| - sum_{j != i} |a_ij|`. Rows with a non-positive
/// margin break dominance.
///
/// Returns `None` for empty or non-square matrices.
pub fn dominance_margins(matrix: &DMatrix<f64>) -> Option<Vec<f64>> {
    if matrix.is_empty() || !matrix.is_square() {
        return None;
    }

    let margins = matrix
        .row_iter()
        .enumerate()
        .map(|(i, row)| {
            let off_diagonal: f64 = row
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, value)| value.abs())
                .sum();
            row[i].abs() - off_diagonal
        })
        .collect();

    Some(margins)
}

/// Zero-based rows whose diagonal does not strictly dominate.
///
/// Empty for empty or non-square matrices.
pub fn non_dominant_rows(matrix: &DMatrix<f64>) -> Vec<usize> {
    dominance_margins(matrix)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter(|(_, margin)| **margin <= 0.0)
        .map(|(row, _)| row)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dominant_matrix_is_detected() {
        let matrix = DMatrix::from_row_slice(3, 3, &[45.0, 2.0, 3.0, -3.0, 22.0, 2.0, 5.0, 1.0, 20.0]);
        assert!(is_diagonally_dominant(&matrix));
    }

    #[test]
    fn dominated_row_breaks_dominance() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 1.0]);
        assert!(!is_diagonally_dominant(&matrix));
    }

    #[test]
    fn equality_is_not_strict_dominance() {
        let matrix = DMatrix::from_row_slice(2, 2, &[2.0, 2.0, 0.0, 1.0]);
        assert!(!is_diagonally_dominant(&matrix));
    }

    #[test]
    fn negative_entries_use_magnitudes() {
        let matrix = DMatrix::from_row_slice(2, 2, &[-5.0, 4.0, -1.0, -3.0]);
        assert!(is_diagonally_dominant(&matrix));
    }

    #[test]
    fn empty_and_non_square_are_rejected() {
        assert!(!is_diagonally_dominant(&DMatrix::<f64>::zeros(0, 0)));
        assert!(!is_diagonally_dominant(&DMatrix::from_element(2, 3, 1.0)));
        assert!(dominance_margins(&DMatrix::from_element(2, 3, 1.0)).is_none());
    }

    #[test]
    fn margins_per_row() {
        let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 10.0]);
        let margins = dominance_margins(&matrix).unwrap();
        assert_relative_eq!(margins[0], -1.0);
        assert_relative_eq!(margins[1], 7.0);
    }

    #[test]
    fn failing_rows_are_listed() {
        let matrix = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 0.0, 0.0, 5.0, 1.0, 1.0, 1.0, 2.0]);
        assert_eq!(non_dominant_rows(&matrix), vec![0, 2]);

        let dominant = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 2.0, 5.0]);
        assert!(non_dominant_rows(&dominant).is_empty());
    }
}
