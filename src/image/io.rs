//! Raster and JSON I/O.
//!
//! - `RasterIo`: the read/write seam the pipeline driver talks to.
//! - `FileRaster`: file-backed implementation. `.pgm` files use the ASCII
//!   `P2` codec below; any other extension goes through the `image` crate.
//! - `pgm_size`: read only the header of an ASCII PGM.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageF32, ImageView};
use crate::error::{Result, SobelError};
use image::GrayImage;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Maximum grey level written to output rasters.
pub const MAX_GREY: f32 = 255.0;

/// Values per line in the ASCII raster body.
const VALUES_PER_LINE: usize = 16;

/// Read/write collaborator used by the pipeline driver.
pub trait RasterIo: Sync {
    /// Load a raster whose declared size must equal `expected` = (width, height).
    fn read_image(&self, path: &Path, expected: (usize, usize)) -> Result<ImageF32>;

    /// Store `image`, normalizing values to [0, 255].
    fn write_image(&self, path: &Path, image: &ImageF32) -> Result<()>;
}

/// Reads and writes rasters on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileRaster;

impl RasterIo for FileRaster {
    fn read_image(&self, path: &Path, expected: (usize, usize)) -> Result<ImageF32> {
        let image = if is_pgm(path) {
            let text = fs::read_to_string(path).map_err(|e| SobelError::io(path, e))?;
            decode_pgm(path, &text, expected)?
        } else {
            let image = load_with_image_crate(path)?;
            check_size(path, (image.w, image.h), expected)?;
            image
        };
        log::debug!(
            "read {}x{} raster from {}",
            image.w,
            image.h,
            path.display()
        );
        Ok(image)
    }

    fn write_image(&self, path: &Path, image: &ImageF32) -> Result<()> {
        ensure_parent_dir(path)?;
        if is_pgm(path) {
            fs::write(path, encode_pgm(image)).map_err(|e| SobelError::io(path, e))
        } else {
            let grey = to_grey_levels(image);
            let too_large = |_: std::num::TryFromIntError| {
                SobelError::raster(path, format!("{}x{} is too large to encode", image.w, image.h))
            };
            let w = u32::try_from(image.w).map_err(too_large)?;
            let h = u32::try_from(image.h).map_err(too_large)?;
            let out = GrayImage::from_raw(w, h, grey)
                .ok_or_else(|| SobelError::raster(path, "grey buffer does not match image size"))?;
            out.save(path).map_err(|e| {
                SobelError::raster(path, format!("failed to encode: {e}"))
            })
        }
    }
}

fn check_size(path: &Path, found: (usize, usize), expected: (usize, usize)) -> Result<()> {
    if found != expected {
        return Err(SobelError::SizeMismatch {
            path: path.to_path_buf(),
            found,
            expected,
        });
    }
    Ok(())
}

fn is_pgm(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pgm"))
}

fn load_with_image_crate(path: &Path) -> Result<ImageF32> {
    if !path.exists() {
        return Err(SobelError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        ));
    }
    let img = image::open(path)
        .map_err(|e| SobelError::raster(path, format!("failed to decode: {e}")))?
        .into_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img.into_raw().into_iter().map(f32::from).collect();
    ImageF32::from_vec(w, h, data)
}

/// Tokens of an ASCII PGM with `#` comment lines removed.
fn pgm_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(str::split_whitespace)
}

fn next_number<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
    what: &str,
) -> Result<usize> {
    let token = tokens
        .next()
        .ok_or_else(|| SobelError::raster(path, format!("missing {what}")))?;
    token
        .parse::<usize>()
        .map_err(|_| SobelError::raster(path, format!("invalid {what} `{token}`")))
}

fn parse_header<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    path: &Path,
) -> Result<(usize, usize)> {
    match tokens.next() {
        Some("P2") => {}
        Some(other) => {
            return Err(SobelError::raster(
                path,
                format!("expected ASCII `P2` magic, found `{other}`"),
            ))
        }
        None => return Err(SobelError::raster(path, "empty file")),
    }
    let w = next_number(tokens, path, "width")?;
    let h = next_number(tokens, path, "height")?;
    Ok((w, h))
}

/// Decode an ASCII `P2` raster, rows top to bottom.
///
/// The declared size is checked against `expected` before the body is read.
pub fn decode_pgm(path: &Path, text: &str, expected: (usize, usize)) -> Result<ImageF32> {
    let mut tokens = pgm_tokens(text);
    let (w, h) = parse_header(&mut tokens, path)?;
    check_size(path, (w, h), expected)?;
    let len = w
        .checked_mul(h)
        .ok_or_else(|| SobelError::raster(path, format!("{w}x{h} overflows the pixel count")))?;
    let _max_value = next_number(&mut tokens, path, "max value")?;

    let mut data = Vec::with_capacity(len);
    for i in 0..len {
        let token = tokens
            .next()
            .ok_or_else(|| SobelError::raster(path, format!("missing pixel {i}")))?;
        let v: u32 = token
            .parse()
            .map_err(|_| SobelError::raster(path, format!("invalid pixel {i} `{token}`")))?;
        data.push(v as f32);
    }
    ImageF32::from_vec(w, h, data)
}

/// Read only the header of an ASCII PGM and return (width, height).
pub fn pgm_size(path: &Path) -> Result<(usize, usize)> {
    let text = fs::read_to_string(path).map_err(|e| SobelError::io(path, e))?;
    let mut tokens = pgm_tokens(&text);
    parse_header(&mut tokens, path)
}

/// Map raw values to output grey levels.
///
/// Values are rescaled by the observed min/max of their absolute values when
/// they fall outside [0, 255], rounded, then passed through a square-root
/// contrast curve that keeps 0 and 255 fixed.
pub fn to_grey_levels(image: &ImageF32) -> Vec<u8> {
    let Some(pixels) = image.as_slice() else {
        return Vec::new();
    };
    let Some(&first) = pixels.first() else {
        return Vec::new();
    };
    let (min, max) = pixels
        .iter()
        .fold((first.abs(), first.abs()), |(lo, hi), &v| {
            (lo.min(v.abs()), hi.max(v.abs()))
        });
    let rescale = max > MAX_GREY;
    let range = max - min;

    pixels
        .iter()
        .map(|&v| {
            let level = if rescale {
                if range > 0.0 {
                    (MAX_GREY * ((v - min).abs() / range) + 0.5).trunc()
                } else {
                    0.0
                }
            } else {
                (v.abs() + 0.5).trunc()
            };
            (MAX_GREY * (level / MAX_GREY).sqrt()).trunc() as u8
        })
        .collect()
}

/// Encode as an ASCII `P2` raster: 4 header lines, 16 values per line.
pub fn encode_pgm(image: &ImageF32) -> String {
    let grey = to_grey_levels(image);
    let mut out = String::with_capacity(32 + grey.len() * 4);
    out.push_str("P2\n");
    out.push_str("# Written by halo_sobel\n");
    let _ = writeln!(out, "{} {}", image.w, image.h);
    let _ = writeln!(out, "{}", MAX_GREY as u32);
    for (k, level) in grey.iter().enumerate() {
        let _ = write!(out, "{level:3} ");
        if (k + 1) % VALUES_PER_LINE == 0 {
            out.push('\n');
        }
    }
    if grey.len() % VALUES_PER_LINE != 0 {
        out.push('\n');
    }
    out
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| SobelError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|e| SobelError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SobelError::io(parent, e))?;
        }
    }
    Ok(())
}
