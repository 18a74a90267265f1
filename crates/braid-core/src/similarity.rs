//! Vector math shared by the embedding stores.

/// L2-normalize a vector. A zero-norm vector is returned unchanged.
pub fn normalize(vector: &[f32]) -> Vec<f32> {
    let norm = l2_norm(vector);
    if norm == 0.0 {
        return vector.to_vec();
    }
    vector.iter().map(|x| x / norm).collect()
}

/// Cosine similarity in [-1, 1].
///
/// Exactly 0 when either operand has zero norm (two zero vectors are not
/// similar), when lengths differ, or when the input is empty.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(&[3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_unchanged() {
        assert_eq!(normalize(&[0.0, 0.0, 0.0]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_self_similarity_is_one() {
        for v in [vec![1.0, 2.0, 3.0], vec![-0.5, 0.25, 8.0, 1e-3], vec![42.0]] {
            let n = normalize(&v);
            assert!((similarity(&n, &n) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_vectors_are_not_similar() {
        let zero = [0.0, 0.0, 0.0, 0.0];
        assert_eq!(similarity(&zero, &zero), 0.0);
        assert_eq!(similarity(&zero, &[1.0, 0.0, 0.0, 0.0]), 0.0);
        assert_eq!(similarity(&[1.0, 0.0, 0.0, 0.0], &zero), 0.0);
    }

    #[test]
    fn test_similarity_bounds() {
        assert!((similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        assert_eq!(similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);

        let pairs = [
            (vec![0.3, -0.7, 0.2], vec![0.9, 0.1, -0.4]),
            (vec![1e6, 1e-6, 3.0], vec![2.0, 5.0, -1e5]),
        ];
        for (a, b) in pairs {
            let s = similarity(&a, &b);
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_length_mismatch_is_zero() {
        assert_eq!(similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(similarity(&[], &[]), 0.0);
    }
}
