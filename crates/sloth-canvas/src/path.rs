//! Path Recording
//!
//! Paths are recorded as commands and replayed into an atlas region when
//! stroked or filled.

/// Path command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
}

/// Recorded path with its running extent
#[derive(Debug, Clone, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
    max_x: f32,
    max_y: f32,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every command
    pub fn begin(&mut self) {
        self.commands.clear();
        self.max_x = 0.0;
        self.max_y = 0.0;
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.extend(x, y);
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        self.extend(x, y);
        self.commands.push(PathCommand::LineTo { x, y });
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::ClosePath);
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Footprint in pixels, padded by `pad` on each axis
    pub fn extent(&self, pad: f32) -> (u32, u32) {
        (
            (self.max_x + pad).ceil().max(1.0) as u32,
            (self.max_y + pad).ceil().max(1.0) as u32,
        )
    }

    /// Build a tiny-skia path, `None` when nothing drawable was recorded
    pub fn to_tiny_skia(&self) -> Option<tiny_skia::Path> {
        let mut builder = tiny_skia::PathBuilder::new();
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo { x, y } => builder.move_to(x, y),
                PathCommand::LineTo { x, y } => builder.line_to(x, y),
                PathCommand::ClosePath => builder.close(),
            }
        }
        builder.finish()
    }

    fn extend(&mut self, x: f32, y: f32) {
        // Negative coordinates fall outside the region and are clipped
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_tracks_max() {
        let mut path = Path::new();
        path.move_to(10.0, 5.0);
        path.line_to(40.0, 12.5);
        path.line_to(-3.0, 30.0);
        path.close();

        assert_eq!(path.commands().len(), 4);
        assert_eq!(path.extent(0.0), (40, 30));
        assert_eq!(path.extent(2.5), (43, 33));
    }

    #[test]
    fn test_begin_resets() {
        let mut path = Path::new();
        path.move_to(10.0, 10.0);
        path.begin();
        assert!(path.is_empty());
        assert_eq!(path.extent(0.0), (1, 1));
        assert!(path.to_tiny_skia().is_none());
    }

    #[test]
    fn test_to_tiny_skia() {
        let mut path = Path::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 0.0);
        path.line_to(10.0, 10.0);
        path.close();

        let built = path.to_tiny_skia().unwrap();
        assert_eq!(built.bounds().right(), 10.0);
    }
}
