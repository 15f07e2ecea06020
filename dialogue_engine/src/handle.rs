//! Access to the game state a conversation is allowed to mutate.

use game_state::GameState;
use std::cell::RefCell;
use std::rc::Rc;

/// Capability to read and mutate a [`GameState`].
///
/// A [`DialogueTree`](crate::DialogueTree) is handed one of these at
/// construction and never reaches game state any other way. Use `&mut GameState`
/// when the conversation can borrow the state for its whole lifetime, an owned
/// `GameState` to move it in and back out with `into_state`, or
/// `Rc<RefCell<GameState>>` when a front end also needs to read it between
/// calls.
pub trait GameStateHandle {
    /// Run `f` with mutable access to the state.
    fn with_state<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R;

    /// Run `f` with shared access to the state.
    fn read_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R;
}

impl GameStateHandle for GameState {
    fn with_state<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(self)
    }

    fn read_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(self)
    }
}

impl GameStateHandle for &mut GameState {
    fn with_state<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut **self)
    }

    fn read_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&**self)
    }
}

/// Panics if the state is already borrowed elsewhere, like any `RefCell`.
impl GameStateHandle for Rc<RefCell<GameState>> {
    fn with_state<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.borrow_mut())
    }

    fn read_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&self.borrow())
    }
}
