// Lossless image encoding for PDF embedding (FlateDecode)

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{Rgb, RgbImage};
use lopdf::{Object, StringFormat};

use crate::error::DarkModeError;

/// Color space of an encoded image XObject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageColorSpace {
    /// 8 bits per component RGB samples.
    DeviceRgb,
    /// Palette lookup into DeviceRGB; `palette` holds RGB triples.
    Indexed { palette: Vec<Rgb<u8>> },
}

impl ImageColorSpace {
    /// PDF representation of this color space.
    pub fn to_object(&self) -> Object {
        match self {
            ImageColorSpace::DeviceRgb => Object::Name(b"DeviceRGB".to_vec()),
            ImageColorSpace::Indexed { palette } => {
                let lookup: Vec<u8> = palette.iter().flat_map(|c| c.0).collect();
                let hival = palette.len().saturating_sub(1) as i64;
                Object::Array(vec![
                    Object::Name(b"Indexed".to_vec()),
                    Object::Name(b"DeviceRGB".to_vec()),
                    Object::Integer(hival),
                    Object::String(lookup, StringFormat::Hexadecimal),
                ])
            }
        }
    }
}

/// A Flate-compressed image ready to become an image XObject.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub color_space: ImageColorSpace,
    pub bits_per_component: u8,
}

/// Encode an RGB raster losslessly.
///
/// A raster with at most two distinct colors is packed as a 1-bit indexed
/// image (rows padded to whole bytes, most significant bit first). Anything
/// else is stored as 8-bit DeviceRGB samples.
pub fn encode_rgb(rgb: &RgbImage) -> crate::error::Result<EncodedImage> {
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(DarkModeError::encode(format!(
            "cannot encode empty raster {width}x{height}"
        )));
    }

    match two_color_palette(rgb) {
        Some(palette) => {
            let packed = pack_indexed_1bit(rgb, &palette);
            Ok(EncodedImage {
                data: deflate(&packed)?,
                width,
                height,
                color_space: ImageColorSpace::Indexed { palette },
                bits_per_component: 1,
            })
        }
        None => Ok(EncodedImage {
            data: deflate(rgb.as_raw())?,
            width,
            height,
            color_space: ImageColorSpace::DeviceRgb,
            bits_per_component: 8,
        }),
    }
}

/// Distinct colors in first-seen order, or `None` when there are more than two.
fn two_color_palette(rgb: &RgbImage) -> Option<Vec<Rgb<u8>>> {
    let mut palette: Vec<Rgb<u8>> = Vec::with_capacity(2);
    for pixel in rgb.pixels() {
        if palette.contains(pixel) {
            continue;
        }
        if palette.len() == 2 {
            return None;
        }
        palette.push(*pixel);
    }
    Some(palette)
}

fn pack_indexed_1bit(rgb: &RgbImage, palette: &[Rgb<u8>]) -> Vec<u8> {
    let (width, height) = rgb.dimensions();
    let row_bytes = (width as usize).div_ceil(8);
    let mut packed = vec![0u8; row_bytes * height as usize];

    for (x, y, pixel) in rgb.enumerate_pixels() {
        if palette.len() == 2 && *pixel == palette[1] {
            let offset = y as usize * row_bytes + (x as usize / 8);
            packed[offset] |= 0x80 >> (x % 8);
        }
    }
    packed
}

fn deflate(data: &[u8]) -> crate::error::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| DarkModeError::encode(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| DarkModeError::encode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    fn inflate(data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn test_two_color_raster_is_indexed() {
        let mut rgb = RgbImage::from_pixel(10, 2, Rgb([51, 51, 51]));
        rgb.put_pixel(0, 0, Rgb([255, 255, 255]));
        rgb.put_pixel(9, 1, Rgb([255, 255, 255]));

        let encoded = encode_rgb(&rgb).unwrap();
        assert_eq!(encoded.bits_per_component, 1);
        assert_eq!(
            encoded.color_space,
            ImageColorSpace::Indexed {
                palette: vec![Rgb([255, 255, 255]), Rgb([51, 51, 51])]
            }
        );

        // 10ピクセル幅 -> 1行2バイト。白が先に現れるので白=0、濃灰=1
        let raw = inflate(&encoded.data);
        assert_eq!(raw, vec![0x7F, 0xC0, 0xFF, 0x80]);
    }

    #[test]
    fn test_single_color_raster_has_one_palette_entry() {
        let rgb = RgbImage::from_pixel(3, 3, Rgb([51, 51, 51]));
        let encoded = encode_rgb(&rgb).unwrap();
        match &encoded.color_space {
            ImageColorSpace::Indexed { palette } => assert_eq!(palette.len(), 1),
            other => panic!("expected indexed color space, got {other:?}"),
        }
        assert_eq!(inflate(&encoded.data), vec![0, 0, 0]);
    }

    #[test]
    fn test_many_color_raster_is_device_rgb() {
        let rgb = RgbImage::from_fn(3, 1, |x, _| Rgb([x as u8 * 50, 0, 0]));
        let encoded = encode_rgb(&rgb).unwrap();
        assert_eq!(encoded.color_space, ImageColorSpace::DeviceRgb);
        assert_eq!(encoded.bits_per_component, 8);
        assert_eq!(inflate(&encoded.data), rgb.into_raw());
    }

    #[test]
    fn test_indexed_color_space_object() {
        let cs = ImageColorSpace::Indexed {
            palette: vec![Rgb([255, 255, 255]), Rgb([51, 51, 51])],
        };
        let obj = cs.to_object();
        let arr = obj.as_array().unwrap();
        assert_eq!(arr[0].as_name().unwrap(), b"Indexed");
        assert_eq!(arr[2].as_i64().unwrap(), 1);
        assert_eq!(arr[3].as_str().unwrap(), &[255, 255, 255, 51, 51, 51]);
    }
}
