/// Index of the first maximum.
pub fn argmax<T: PartialOrd>(values: &[T]) -> usize {
    let mut result: usize = 0;
    for (i, v) in values.iter().enumerate() {
        if v > &values[result] {
            result = i;
        }
    }
    result
}

pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

pub fn moving_average(window: usize, vector: &[f64]) -> Vec<f64> {
    let window = window.max(1);
    vector
        .chunks(window)
        .map(|slice| slice.iter().sum::<f64>() / slice.len() as f64)
        .collect()
}
