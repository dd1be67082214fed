//! Validates the code examples from README.md compile and behave correctly.

#[test]
fn readme_core_api() {
    use darken::{Lightness, darken_pixels};
    use rgb::Rgba;

    let mut pixels = vec![Rgba::new(200u8, 100, 50, 255), Rgba::new(255, 255, 255, 0)];
    darken_pixels(&mut pixels, Lightness::from(128u8));
    assert_eq!(pixels, [Rgba::new(100, 50, 25, 255), Rgba::new(127, 127, 127, 0)]);
}

#[test]
fn readme_raw_bytes() {
    use darken::{Lightness, darken_rgba_inplace};

    let mut bytes = vec![200u8, 100, 50, 255, 8, 16, 32, 64];
    darken_rgba_inplace(&mut bytes, Lightness::from(64u8)).unwrap();
    assert_eq!(bytes, [50, 25, 12, 255, 2, 4, 8, 64]);
}

#[test]
fn readme_forced_scalar() {
    use darken::{Lightness, Strategy, darken_pixels_with};
    use rgb::Rgba;

    let mut pixels = vec![Rgba::new(90u8, 180, 255, 1); 10];
    let ran = darken_pixels_with(&mut pixels, Lightness::from(200u8), Strategy::Scalar);
    assert_eq!(ran, Strategy::Scalar);
    assert_eq!(pixels[9], Rgba::new(70, 140, 199, 1));
}

#[test]
fn readme_imgref() {
    use darken::{Lightness, darken_img};
    use imgref::ImgVec;
    use rgb::Rgba;

    let mut img = ImgVec::new(vec![Rgba::new(255u8, 0, 128, 200); 640 * 480], 640, 480);
    darken_img(img.as_mut(), Lightness::BLACK);
    assert!(img.pixels().all(|px| px == Rgba::new(0, 0, 0, 200)));
}
