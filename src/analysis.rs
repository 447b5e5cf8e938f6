/*!
# Focal plane image analysis

[`Analysis`] chains the centroid estimation, the background subtraction and
the encircled energy computation for one image at a time:

```rust,no_run
use encircled_energy::{Analysis, NpyImage, scale::Fixed};

let report = Analysis::default()
    .scale(Fixed(435.))
    .study_radius_mm(1.5)
    .run(&NpyImage::new("frame.npy"))?;
println!("{report}");
# Ok::<(), encircled_energy::Error>(())
```

Each image is analyzed independently; [`Analysis::run_batch`] processes
many images in parallel and returns one result per image.
*/

use std::{fmt, time::Instant};

use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::{
    background::subtract_background,
    centroid::estimate_centroid,
    encircled_energy::{compute_encircled_energy, EncircledEnergy},
    scale::{Asi294, Scale},
    Centroid, Error, ImageSource, Result,
};

/// Study radius
#[derive(Debug, Clone, Copy, PartialEq)]
enum StudyRadius {
    Millimeters(f64),
    Pixels(usize),
}

/// Analysis configuration
pub struct Analysis {
    scale: Box<dyn Scale>,
    study_radius: StudyRadius,
}
impl Default for Analysis {
    /// ASI294 camera and a 1.5mm study radius
    fn default() -> Self {
        Self {
            scale: Box::new(Asi294),
            study_radius: StudyRadius::Millimeters(1.5),
        }
    }
}
impl fmt::Debug for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analysis")
            .field("study_radius", &self.study_radius)
            .finish_non_exhaustive()
    }
}
impl Analysis {
    /// Sets the plate scale provider
    pub fn scale<S: Scale + 'static>(self, scale: S) -> Self {
        Self {
            scale: Box::new(scale),
            ..self
        }
    }
    /// Sets the study radius in millimeters
    pub fn study_radius_mm(self, radius: f64) -> Self {
        Self {
            study_radius: StudyRadius::Millimeters(radius),
            ..self
        }
    }
    /// Sets the study radius in pixels, ignoring the plate scale
    pub fn study_radius_pixels(self, radius: usize) -> Self {
        Self {
            study_radius: StudyRadius::Pixels(radius),
            ..self
        }
    }
    /// Study radius in pixels for a given plate scale
    pub fn radius_pixels(&self, pixels_per_mm: f64) -> Result<usize> {
        match self.study_radius {
            StudyRadius::Pixels(0) => Err(Error::invalid_parameter("study radius must be positive")),
            StudyRadius::Pixels(r) => Ok(r),
            StudyRadius::Millimeters(r)
                if r > 0. && pixels_per_mm > 0. && (r * pixels_per_mm).is_finite() =>
            {
                Ok((r * pixels_per_mm).ceil() as usize)
            }
            StudyRadius::Millimeters(r) => Err(Error::invalid_parameter(format!(
                "study radius ({r}mm) and plate scale ({pixels_per_mm}px/mm) must be positive and finite"
            ))),
        }
    }
    /// Analyzes a single image
    pub fn run<S: ImageSource + ?Sized>(&self, source: &S) -> Result<Report> {
        let now = Instant::now();
        let name = source.name();
        let image = source.load()?;
        let (width, height) = image.shape();
        let pixels_per_mm = self.scale.pixels_per_mm(width, height);
        let radius = self.radius_pixels(pixels_per_mm)?;
        log::debug!("{name}: {width}x{height}, {pixels_per_mm}px/mm, radius: {radius}px");

        let centroid = estimate_centroid(&image)?;
        let background = subtract_background(&image, centroid, radius)?;
        let encircled_energy = compute_encircled_energy(&background.image, centroid, radius)?;
        let profile = background.image.row_profile(
            centroid.y,
            centroid.x.saturating_sub(radius),
            centroid.x.saturating_add(radius),
        );

        log::info!("{name} analyzed in {}ms", now.elapsed().as_millis());
        Ok(Report {
            name,
            shape: (width, height),
            centroid,
            background: background.level,
            pixels_per_mm,
            radius,
            encircled_energy,
            profile,
        })
    }
    /// Analyzes all the images in parallel
    ///
    /// The results are in the same order as the sources; a failure
    /// of one image does not affect the others.
    pub fn run_batch<S>(&self, sources: &[S]) -> Vec<(String, Result<Report>)>
    where
        S: ImageSource + Sync,
    {
        let pb = ProgressBar::new(sources.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Analyzing images");
        let results: Vec<_> = sources
            .par_iter()
            .progress_with(pb.clone())
            .map(|source| (source.name(), self.run(source)))
            .collect();
        pb.finish_with_message("All images analyzed");
        results
    }
}

/// Analysis results for one image
#[derive(Debug, Clone)]
pub struct Report {
    pub name: String,
    /// image (width, height)
    pub shape: (usize, usize),
    pub centroid: Centroid,
    /// background level removed from the image
    pub background: f64,
    pub pixels_per_mm: f64,
    /// study radius [px]
    pub radius: usize,
    pub encircled_energy: EncircledEnergy,
    /// background subtracted samples along the centroid row, over the study diameter
    pub profile: Vec<f64>,
}
impl Report {
    /// Radius [px] enclosing 50% of the flux
    pub fn ee50(&self) -> Option<usize> {
        self.encircled_energy.ee50()
    }
    /// Radius [px] enclosing 95% of the flux
    pub fn ee95(&self) -> Option<usize> {
        self.encircled_energy.ee95()
    }
    /// Radius [mm] enclosing 50% of the flux
    pub fn ee50_mm(&self) -> Option<f64> {
        self.ee50().map(|r| r as f64 / self.pixels_per_mm)
    }
    /// Radius [mm] enclosing 95% of the flux
    pub fn ee95_mm(&self) -> Option<f64> {
        self.ee95().map(|r| r as f64 / self.pixels_per_mm)
    }
    /// Diameter [mm] of the aperture the curve is normalized to
    pub fn aperture_diameter_mm(&self) -> f64 {
        2. * self.radius as f64 / self.pixels_per_mm
    }
    /// Largest sample of the centroid row profile, to look for saturation
    pub fn profile_peak(&self) -> Option<f64> {
        self.profile.iter().cloned().reduce(f64::max)
    }
}
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mm = |v: Option<f64>| v.map_or_else(|| String::from("n/a"), |v| format!("{v:.3} mm"));
        writeln!(f, "Analyzing: {}", self.name)?;
        writeln!(f, " - data shape: {}x{}", self.shape.0, self.shape.1)?;
        writeln!(f, " - centroid: {}", self.centroid)?;
        writeln!(f, " - background: {:.3}", self.background)?;
        writeln!(f, " - 1mm = {} pixels", self.pixels_per_mm)?;
        writeln!(
            f,
            " - study radius: {}px (Ø {:.3} mm)",
            self.radius,
            self.aperture_diameter_mm()
        )?;
        if let Some(peak) = self.profile_peak() {
            writeln!(f, " - centroid row peak: {peak:.3}")?;
        }
        writeln!(f, " - 50% ee = {}", mm(self.ee50_mm()))?;
        write!(f, " - 95% ee = {}", mm(self.ee95_mm()))
    }
}
