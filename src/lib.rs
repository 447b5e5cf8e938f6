/*!
# Encircled energy

Optical quality analysis of focal plane images.

The light centroid of an image is located, a uniform background level is
removed and the encircled energy curve, the fraction of the total flux within
increasing radii around the centroid, is computed.
The radii enclosing 50% and 95% of the flux are derived from the curve.

The three steps are available as standalone functions:

```rust
use encircled_energy::{
    compute_encircled_energy, estimate_centroid, subtract_background, Image,
};

let image = Image::from_fn(64, 64, |x, y| {
    let (dx, dy) = (x as f64 - 32., y as f64 - 32.);
    1. + 100. * (-(dx * dx + dy * dy) / 8.).exp()
})?;
let centroid = estimate_centroid(&image)?;
let background = subtract_background(&image, centroid, 16)?;
let ee = compute_encircled_energy(&background.image, centroid, 16)?;
assert!(ee.ee50() <= ee.ee95());
# Ok::<(), encircled_energy::Error>(())
```

or chained with [`Analysis`].
*/

pub mod analysis;
pub mod background;
pub mod centroid;
pub mod encircled_energy;
mod error;
mod image;
pub mod scale;
mod source;

pub use analysis::{Analysis, Report};
pub use background::{subtract_background, Background};
pub use centroid::estimate_centroid;
pub use encircled_energy::{compute_encircled_energy, percentile_radius, EncircledEnergy};
pub use error::{Error, Result};
pub use image::{Centroid, Image};
pub use source::{ImageSource, NpyImage};
