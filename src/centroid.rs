use crate::{Centroid, Error, Image, Result};

/// Flux weighted center of the image
///
/// The image mean is removed and negative samples are set to zero,
/// so only the pixels above the mean contribute.
/// The weighted column and row indices are truncated to integers.
pub fn estimate_centroid(image: &Image) -> Result<Centroid> {
    let mean = image.mean();
    let signal = image.map(|v| (v - mean).max(0.));
    let total = signal.sum();
    if !(total > 0.) {
        return Err(Error::invalid_image("no signal above mean"));
    }
    let weighted_index = |sums: Vec<f64>| {
        sums.into_iter()
            .enumerate()
            .map(|(i, s)| i as f64 * s)
            .sum::<f64>()
            / total
    };
    let x = weighted_index(signal.column_sums()) as usize;
    let y = weighted_index(signal.row_sums()) as usize;
    let centroid = Centroid::new(x.min(image.width() - 1), y.min(image.height() - 1));
    log::debug!("centroid: {centroid} (mean: {mean:.3}, signal: {total:.3})");
    Ok(centroid)
}
