//! CPU Surfaces
//!
//! RGBA8 pixel buffers. Atlases rasterize into one, images are passed in as
//! one, and the GPU backend uploads from one.

/// Row-major RGBA pixel buffer (premultiplied alpha)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * 4],
        }
    }

    /// Wrap existing RGBA bytes. Returns `None` if the length does not match.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Create a surface filled with one color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self { width, height, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.data[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Reset every pixel to transparent
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Size of the pixel buffer in bytes
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Surface::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Surface::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_filled_and_pixel() {
        let surface = Surface::filled(3, 2, [1, 2, 3, 4]);
        assert_eq!(surface.pixel(2, 1), Some([1, 2, 3, 4]));
        assert_eq!(surface.pixel(3, 0), None);
    }
}
