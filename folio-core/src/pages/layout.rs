//! Shell around every page

/// Sidebar visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    sidebar_open: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self { sidebar_open: true }
    }
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn open_sidebar(&mut self) {
        self.sidebar_open = true;
    }
}
