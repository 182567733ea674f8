use halo_sobel::image::ImageF32;

/// All pixels set to `value`.
pub fn uniform(width: usize, height: usize, value: f32) -> ImageF32 {
    ImageF32::from_vec(width, height, vec![value; width * height]).unwrap()
}

/// Black image with one pixel at (row, col) set to `value`.
pub fn single_spot(width: usize, height: usize, row: usize, col: usize, value: f32) -> ImageF32 {
    let mut img = ImageF32::new(width, height);
    img.set(row, col, value).unwrap();
    img
}

/// Generates a simple high-contrast checkerboard image.
pub fn checkerboard(width: usize, height: usize, cell: usize) -> ImageF32 {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut data = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            data[y * width + x] = if sum & 1 == 0 { 32.0 } else { 220.0 };
        }
    }
    ImageF32::from_vec(width, height, data).unwrap()
}

/// ASCII PGM text for `image`, one row per line.
pub fn to_pgm_text(image: &ImageF32) -> String {
    let mut out = format!("P2\n# synthetic\n{} {}\n255\n", image.w, image.h);
    for row in image.data.chunks(image.w) {
        let line: Vec<String> = row.iter().map(|v| (*v as u32).to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}
