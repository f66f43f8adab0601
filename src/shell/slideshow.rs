//! Carousel position with prev/next and dot controls.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slideshow {
    len: usize,
    index: usize,
}

impl Slideshow {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self { len, index: 0 }
    }

    #[must_use]
    pub fn current(self) -> Option<usize> {
        (self.len > 0).then_some(self.index)
    }

    #[must_use]
    pub fn len(self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<usize> {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
        self.current()
    }

    /// Jumps to a dot; out-of-range dots select the last slide.
    pub fn go_to(&mut self, dot: usize) -> Option<usize> {
        if self.len > 0 {
            self.index = dot.min(self.len - 1);
        }
        self.current()
    }

    /// Which dots are lit, for rendering.
    #[must_use]
    pub fn dots(self) -> Vec<bool> {
        (0..self.len).map(|i| i == self.index).collect()
    }
}
