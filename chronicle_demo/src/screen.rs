//! Screens and the stack that decides which one receives input.

/// One full-screen mode of the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Instructions,
    MainMenu,
    Dialogue,
}

/// Abstract input events. Front ends map keys or commands onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Up,
    Down,
    Confirm,
    /// Any other key; only dismisses the instructions screen.
    Any,
}

/// Last-in, first-out stack of screens. The top screen is active.
#[derive(Debug, Clone, Default)]
pub struct ScreenStack {
    screens: Vec<Screen>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, screen: Screen) {
        self.screens.push(screen);
    }

    /// Remove the active screen, returning it.
    pub fn pop(&mut self) -> Option<Screen> {
        self.screens.pop()
    }

    /// The active screen.
    pub fn top(&self) -> Option<Screen> {
        self.screens.last().copied()
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.screens.is_empty()
    }
}
