use std::{fs::File, io::BufWriter, path::PathBuf};

use npyz::{Order, WriterBuilder};

use encircled_energy::{
    compute_encircled_energy, estimate_centroid, percentile_radius, scale::Fixed,
    subtract_background, Analysis, Centroid, Error, Image, ImageSource, NpyImage,
};

fn gaussian_spot(width: usize, height: usize, cx: f64, cy: f64, sigma: f64) -> Image {
    Image::from_fn(width, height, |x, y| {
        let (dx, dy) = (x as f64 - cx, y as f64 - cy);
        5. + 1000. * (-(dx * dx + dy * dy) / (2. * sigma * sigma)).exp()
    })
    .unwrap()
}

fn save_npy<T: npyz::AutoSerialize>(name: &str, width: usize, samples: Vec<T>) -> PathBuf {
    save_npy_with_order(name, width, samples, Order::C)
}

/// Writes `samples` as a `height x width` array; Fortran order expects column-major samples
fn save_npy_with_order<T: npyz::AutoSerialize>(
    name: &str,
    width: usize,
    samples: Vec<T>,
    order: Order,
) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}-{name}.npy", std::process::id()));
    let height = samples.len() / width;
    let mut file = BufWriter::new(File::create(&path).unwrap());
    let mut writer = npyz::WriteOptions::<T>::new()
        .default_dtype()
        .shape(&[height as u64, width as u64])
        .order(order)
        .writer(&mut file)
        .begin_nd()
        .unwrap();
    writer.extend(samples).unwrap();
    writer.finish().unwrap();
    path
}

#[test]
fn flat_disk_scenario() {
    let c = Centroid::new(20, 20);
    let image = Image::from_fn(64, 64, |x, y| if c.distance_to(x, y) <= 5. { 10. } else { 0. })
        .unwrap();
    let centroid = estimate_centroid(&image).unwrap();
    assert_eq!(centroid, c);
    let background = subtract_background(&image, centroid, 10).unwrap();
    assert_eq!(background.level, 0.);
    let ee = compute_encircled_energy(&background.image, centroid, 10).unwrap();
    assert_eq!(ee.len(), 11);
    assert!(ee[5..].iter().all(|&v| v == 1.));
    assert!(percentile_radius(&ee, 0.5).unwrap() <= 5);
}

#[test]
fn gaussian_spot_percentiles() {
    let image = gaussian_spot(128, 96, 70.3, 40.4, 3.);
    let centroid = estimate_centroid(&image).unwrap();
    assert_eq!(centroid, Centroid::new(70, 40));
    let background = subtract_background(&image, centroid, 30).unwrap();
    assert!((background.level - 5.).abs() < 1e-6);
    let ee = compute_encircled_energy(&background.image, centroid, 30).unwrap();
    let (ee50, ee95) = (ee.ee50().unwrap(), ee.ee95().unwrap());
    // 50% and 95% of a 2-D gaussian are enclosed at 1.18σ and 2.45σ
    assert!((3..=5).contains(&ee50), "ee50: {ee50}");
    assert!((7..=9).contains(&ee95), "ee95: {ee95}");
}

#[test]
fn constant_image_fails() {
    let image = Image::filled(32, 32, 100.).unwrap();
    assert!(matches!(
        Analysis::default().study_radius_pixels(4).run(&image),
        Err(Error::InvalidImage(_))
    ));
}

#[test]
fn study_radius_too_large() {
    let image = gaussian_spot(32, 32, 16., 16., 2.);
    let centroid = estimate_centroid(&image).unwrap();
    assert!(matches!(
        subtract_background(&image, centroid, 32),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn npy_image() {
    let width = 64;
    let samples: Vec<u16> = (0..width * 48)
        .map(|k| {
            let (x, y) = (k % width, k / width);
            if (40..44).contains(&x) && (10..14).contains(&y) {
                4000
            } else {
                100
            }
        })
        .collect();
    let path = save_npy("spot", width, samples);
    let source = NpyImage::new(&path);
    let image = source.load().unwrap();
    assert_eq!(image.shape(), (64, 48));
    assert_eq!(image.at(41, 12), 4000.);
    assert_eq!(image.at(0, 0), 100.);

    let report = Analysis::default()
        .scale(Fixed(2.))
        .study_radius_mm(4.)
        .run(&source)
        .unwrap();
    assert_eq!(report.radius, 8);
    // weighted mean of columns 40..44 is 41.5
    assert_eq!(report.centroid, Centroid::new(41, 11));
    assert!((report.background - 100.).abs() < 1e-9);
    assert!(report.ee50() <= report.ee95());
    std::fs::remove_file(path).ok();
}

#[test]
fn npy_missing_file() {
    let source = NpyImage::new("does/not/exist.npy");
    assert!(matches!(source.load(), Err(Error::Io(..))));
}

#[test]
fn npy_fortran_order() {
    // 3 columns x 2 rows, stored column by column
    let path = save_npy_with_order("fortran", 3, vec![0f64, 3., 1., 4., 2., 5.], Order::Fortran);
    let image = NpyImage::new(&path).load().unwrap();
    assert_eq!(image.shape(), (3, 2));
    assert_eq!(image.to_row_major(), vec![0., 1., 2., 3., 4., 5.]);
    assert_eq!(image.at(2, 0), 2.);
    assert_eq!(image.at(0, 1), 3.);
    std::fs::remove_file(path).ok();
}

#[test]
fn npy_dtypes() {
    let path = save_npy("float32", 2, vec![0.5f32, 1.5, -2., 8.]);
    let image = NpyImage::new(&path).load().unwrap();
    assert_eq!(image.to_row_major(), vec![0.5, 1.5, -2., 8.]);
    std::fs::remove_file(path).ok();

    let path = save_npy("int32", 2, vec![-3i32, 7, 70000, 0]);
    let image = NpyImage::new(&path).load().unwrap();
    assert_eq!(image.to_row_major(), vec![-3., 7., 70000., 0.]);
    std::fs::remove_file(path).ok();

    let path = save_npy("int16", 2, vec![-1i16, 2, 3, -4]);
    let image = NpyImage::new(&path).load().unwrap();
    assert_eq!(image.to_row_major(), vec![-1., 2., 3., -4.]);
    std::fs::remove_file(path).ok();

    let path = save_npy("int64", 2, vec![1i64 << 40, 2, 3, 4]);
    let image = NpyImage::new(&path).load().unwrap();
    assert_eq!(image.at(0, 0), (1i64 << 40) as f64);
    std::fs::remove_file(path).ok();

    let path = save_npy("uint8", 2, vec![0u8, 255, 128, 1]);
    let image = NpyImage::new(&path).load().unwrap();
    assert_eq!(image.to_row_major(), vec![0., 255., 128., 1.]);
    std::fs::remove_file(path).ok();
}

#[test]
fn npy_unsupported_dtype() {
    let path = save_npy("int8", 2, vec![1i8, 2, 3, 4]);
    assert!(matches!(
        NpyImage::new(&path).load(),
        Err(Error::NpyType(..))
    ));
    std::fs::remove_file(path).ok();
}

#[test]
fn npy_not_2d() {
    let path = std::env::temp_dir().join(format!("{}-vector.npy", std::process::id()));
    npyz::to_file_1d(&path, vec![1f64, 2., 3.]).unwrap();
    assert!(matches!(
        NpyImage::new(&path).load(),
        Err(Error::InvalidImage(_))
    ));
    std::fs::remove_file(path).ok();
}
