//! The demo session: routes input to the active screen and describes what to show.

use dialogue_engine::{DialogueGraph, DialogueResult, DialogueTree, GameStateHandle};
use game_state::{Faction, GameState};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::DemoConfig;
use crate::screen::{Input, Screen, ScreenStack};

/// The diplomatic-corps greeting played when no dialogue file is configured.
pub const BUILTIN_DIALOGUE: &str = include_str!("../data/welcome.json");

const MENU_ITEMS: [&str; 3] = ["Start Dialogue Demo", "View Instructions", "Exit"];

const INSTRUCTIONS: &[&str] = &[
    "Welcome to the EVE Chronicle RPG Framework Demo!",
    "",
    "CONTROLS:",
    "  UP/DOWN - Navigate menus and dialogue choices",
    "  CONFIRM - Select menu option or advance dialogue",
    "",
    "FEATURES DEMONSTRATED:",
    "  - Screen stack with menu, instructions and dialogue",
    "  - Dialogue engine with branching conversations",
    "  - Faction reputation system",
];

type SharedState = Rc<RefCell<GameState>>;

/// What the session asks of its front end after handling input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Quit,
}

/// A front-end-agnostic description of the active screen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct View {
    pub title: String,
    pub body: Vec<String>,
    pub options: Vec<String>,
    /// Index into `options` of the highlighted entry.
    pub selected: Option<usize>,
    pub footer: Vec<String>,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        for line in &self.body {
            writeln!(f, "{}", line)?;
        }
        if !self.options.is_empty() {
            writeln!(f)?;
        }
        for (i, option) in self.options.iter().enumerate() {
            let prefix = if self.selected == Some(i) { "> " } else { "  " };
            writeln!(f, "{}{}", prefix, option)?;
        }
        if !self.footer.is_empty() {
            writeln!(f)?;
        }
        for line in &self.footer {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// One player's run through the demo.
pub struct DemoSession {
    config: DemoConfig,
    state: SharedState,
    screens: ScreenStack,
    /// Highlighted entry on the active menu or choice list.
    selection: usize,
    dialogue: Option<DialogueTree<SharedState>>,
    last_error: Option<String>,
}

impl DemoSession {
    /// Open on the instructions screen, with the main menu underneath.
    pub fn new(config: DemoConfig) -> Self {
        let state = Rc::new(RefCell::new(config.initial_state()));
        let mut screens = ScreenStack::new();
        screens.push(Screen::MainMenu);
        screens.push(Screen::Instructions);

        Self {
            config,
            state,
            screens,
            selection: 0,
            dialogue: None,
            last_error: None,
        }
    }

    pub fn active_screen(&self) -> Option<Screen> {
        self.screens.top()
    }

    pub fn selection(&self) -> usize {
        self.selection
    }

    /// Shared game state; readable at any time between inputs.
    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn dialogue(&self) -> Option<&DialogueTree<SharedState>> {
        self.dialogue.as_ref()
    }

    /// The reason the last dialogue failed to start, if it did.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn handle_input(&mut self, input: Input) -> Signal {
        match self.screens.top() {
            Some(Screen::Instructions) => {
                self.screens.pop();
                Signal::Continue
            }
            Some(Screen::MainMenu) => self.handle_menu(input),
            Some(Screen::Dialogue) => {
                self.handle_dialogue(input);
                Signal::Continue
            }
            None => Signal::Quit,
        }
    }

    fn handle_menu(&mut self, input: Input) -> Signal {
        match input {
            Input::Up => self.selection = wrap_prev(self.selection, MENU_ITEMS.len()),
            Input::Down => self.selection = wrap_next(self.selection, MENU_ITEMS.len()),
            Input::Confirm => match self.selection {
                0 => self.start_dialogue(),
                1 => self.screens.push(Screen::Instructions),
                _ => {
                    info!("Exit selected from main menu");
                    return Signal::Quit;
                }
            },
            Input::Any => {}
        }
        Signal::Continue
    }

    fn handle_dialogue(&mut self, input: Input) {
        let Some(tree) = self.dialogue.as_mut() else {
            self.close_dialogue();
            return;
        };
        let count = tree.choices().len();

        match input {
            Input::Up if count > 0 => self.selection = wrap_prev(self.selection, count),
            Input::Down if count > 0 => self.selection = wrap_next(self.selection, count),
            Input::Confirm => {
                if tree.at_dead_end() {
                    self.close_dialogue();
                    return;
                }
                if let Err(e) = tree.advance(self.selection) {
                    warn!("Dialogue input out of sync: {}", e);
                    self.close_dialogue();
                    return;
                }
                self.selection = 0;
                if tree.is_finished() {
                    self.close_dialogue();
                }
            }
            _ => {}
        }
    }

    fn open_tree(&self) -> DialogueResult<DialogueTree<SharedState>> {
        let state = Rc::clone(&self.state);
        match &self.config.dialogue_path {
            Some(path) => DialogueTree::load(path, state),
            None => {
                let graph = DialogueGraph::from_json_str(BUILTIN_DIALOGUE)?;
                Ok(DialogueTree::new(Arc::new(graph), state))
            }
        }
    }

    /// Enter dialogue mode. On a bad graph, log it and stay on the menu.
    fn start_dialogue(&mut self) {
        match self.open_tree() {
            Ok(tree) => {
                self.dialogue = Some(tree);
                self.screens.push(Screen::Dialogue);
                self.selection = 0;
                self.last_error = None;
            }
            Err(e) => {
                error!("Could not start dialogue: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn close_dialogue(&mut self) {
        if let Some(tree) = self.dialogue.take() {
            info!("Leaving dialogue {}", tree.id());
        }
        if self.screens.top() == Some(Screen::Dialogue) {
            self.screens.pop();
        }
        self.selection = 0;
    }

    /// Describe the active screen.
    pub fn view(&self) -> View {
        match self.screens.top() {
            Some(Screen::Instructions) => View {
                title: format!("{} - Instructions", self.config.title),
                body: instructions_body(),
                ..View::default()
            },
            Some(Screen::MainMenu) => {
                let mut footer = Vec::new();
                if let Some(e) = &self.last_error {
                    footer.push(format!("Dialogue unavailable: {}", e));
                }
                View {
                    title: self.config.title.clone(),
                    options: MENU_ITEMS.iter().map(|item| item.to_string()).collect(),
                    selected: Some(self.selection),
                    footer,
                    ..View::default()
                }
            }
            Some(Screen::Dialogue) => self.dialogue_view(),
            None => View::default(),
        }
    }

    fn dialogue_view(&self) -> View {
        let standings = self.state.read_state(|state| state.factions.to_string());
        let footer = vec!["Faction Standings:".to_string(), standings];

        let Some(node) = self.dialogue.as_ref().and_then(|tree| tree.current_node()) else {
            return View {
                title: "Dialogue".to_string(),
                footer,
                ..View::default()
            };
        };

        let mut body = vec![node.text.clone()];
        let (options, selected) = if node.is_dead_end() {
            (vec!["[End conversation]".to_string()], Some(0))
        } else {
            body.push(String::new());
            body.push("Choose your response:".to_string());
            (
                node.choices.iter().map(|choice| choice.text.clone()).collect(),
                Some(self.selection),
            )
        };

        View {
            title: "Dialogue".to_string(),
            body,
            options,
            selected,
            footer,
        }
    }
}

/// The static help text followed by the empire roster.
fn instructions_body() -> Vec<String> {
    let mut body: Vec<String> = INSTRUCTIONS.iter().map(|line| line.to_string()).collect();
    body.push(String::new());
    body.push("THE EMPIRES:".to_string());
    for faction in Faction::ALL {
        body.push(format!("  {}", faction.display_name()));
        body.push(format!("    {}", faction.description()));
        body.push(format!("    \"{}\"", faction.philosophy()));
    }
    body.push(String::new());
    body.push("Press any key to continue...".to_string());
    body
}

fn wrap_prev(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

fn wrap_next(index: usize, len: usize) -> usize {
    (index + 1) % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn on_menu() -> DemoSession {
        let mut session = DemoSession::new(DemoConfig::default());
        session.handle_input(Input::Any);
        session
    }

    fn in_dialogue() -> DemoSession {
        let mut session = on_menu();
        session.handle_input(Input::Confirm);
        session
    }

    #[test]
    fn test_builtin_dialogue_is_valid() {
        let graph = DialogueGraph::from_json_str(BUILTIN_DIALOGUE).unwrap();
        assert_eq!(graph.start().as_str(), "greeting");
        assert_eq!(graph.node_count(), 5);
    }

    #[test]
    fn test_opens_on_instructions() {
        let mut session = DemoSession::new(DemoConfig::default());
        assert_eq!(session.active_screen(), Some(Screen::Instructions));
        assert!(session.view().body[0].contains("Welcome"));

        assert_eq!(session.handle_input(Input::Down), Signal::Continue);
        assert_eq!(session.active_screen(), Some(Screen::MainMenu));
        assert_eq!(session.selection(), 0);
    }

    #[test]
    fn test_instructions_list_empires() {
        let session = DemoSession::new(DemoConfig::default());
        let body = session.view().body;

        let roster = body.iter().position(|line| line == "THE EMPIRES:").unwrap();
        assert_eq!(body[roster + 1], "  Caldari State");
        assert!(body[roster + 2].contains("shield technology"));
        let minmatar = roster + 3 * Faction::ALL.len();
        assert_eq!(
            body[minmatar],
            "    \"Freedom, tribal honor, and revenge against oppressors.\""
        );
        assert_eq!(body.last().unwrap(), "Press any key to continue...");
    }

    #[test]
    fn test_menu_selection_wraps() {
        let mut session = on_menu();
        session.handle_input(Input::Up);
        assert_eq!(session.selection(), 2);
        session.handle_input(Input::Down);
        assert_eq!(session.selection(), 0);
        session.handle_input(Input::Down);
        assert_eq!(session.view().selected, Some(1));
    }

    #[test]
    fn test_view_instructions_and_exit() {
        let mut session = on_menu();
        session.handle_input(Input::Down);
        session.handle_input(Input::Confirm);
        assert_eq!(session.active_screen(), Some(Screen::Instructions));

        session.handle_input(Input::Any);
        assert_eq!(session.active_screen(), Some(Screen::MainMenu));

        session.handle_input(Input::Down);
        assert_eq!(session.handle_input(Input::Confirm), Signal::Quit);
    }

    #[test]
    fn test_start_dialogue() {
        let session = in_dialogue();
        assert_eq!(session.active_screen(), Some(Screen::Dialogue));

        let view = session.view();
        assert!(view.body[0].starts_with("Greetings, capsuleer."));
        assert_eq!(view.options.len(), 3);
        assert_eq!(view.selected, Some(0));
        assert_eq!(
            view.footer[1],
            "Caldari: +0 | Gallente: +0 | Amarr: +0 | Minmatar: +0"
        );
    }

    #[test]
    fn test_support_caldari_then_farewell() {
        let mut session = in_dialogue();

        // greeting -> factions
        session.handle_input(Input::Confirm);
        assert!(session.view().body[0].starts_with("The four major empires"));

        // factions -> caldari_support
        session.handle_input(Input::Confirm);
        assert_eq!(session.state().borrow().factions.standing("Caldari"), 5);

        // caldari_support -> greeting
        session.handle_input(Input::Confirm);

        // Farewell.
        session.handle_input(Input::Up);
        assert_eq!(session.selection(), 2);
        session.handle_input(Input::Confirm);

        assert_eq!(session.active_screen(), Some(Screen::MainMenu));
        assert!(session.dialogue().is_none());
        assert_eq!(session.selection(), 0);
        assert_eq!(session.state().borrow().factions.standing("Caldari"), 5);
    }

    #[test]
    fn test_standings_persist_across_conversations() {
        let mut session = in_dialogue();
        for _ in 0..2 {
            session.handle_input(Input::Confirm); // greeting -> factions
            session.handle_input(Input::Down);
            session.handle_input(Input::Confirm); // factions -> gallente_support
            session.handle_input(Input::Confirm); // -> greeting
        }
        session.handle_input(Input::Up);
        session.handle_input(Input::Confirm); // Farewell.
        assert_eq!(session.active_screen(), Some(Screen::MainMenu));

        session.handle_input(Input::Confirm);
        assert_eq!(session.active_screen(), Some(Screen::Dialogue));
        assert_eq!(session.state().borrow().factions.standing("Gallente"), 10);
    }

    #[test]
    fn test_dead_end_closes_on_confirm() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"start": "a", "nodes": {{
                "a": {{"text": "Job's done?", "choices": [{{"text": "Yes.", "next": "b"}}]}},
                "b": {{"text": "Fly safe."}}
            }}}}"#
        )
        .unwrap();

        let config = DemoConfig {
            dialogue_path: Some(file.path().to_path_buf()),
            ..DemoConfig::default()
        };
        let mut session = DemoSession::new(config);
        session.handle_input(Input::Any);
        session.handle_input(Input::Confirm);
        session.handle_input(Input::Confirm);

        let view = session.view();
        assert_eq!(view.body, vec!["Fly safe.".to_string()]);
        assert_eq!(view.options, vec!["[End conversation]".to_string()]);

        session.handle_input(Input::Down);
        assert_eq!(session.active_screen(), Some(Screen::Dialogue));
        session.handle_input(Input::Confirm);
        assert_eq!(session.active_screen(), Some(Screen::MainMenu));
    }

    #[test]
    fn test_malformed_dialogue_stays_on_menu() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"start": "missing", "nodes": {{"a": {{"text": "hi"}}}}}}"#).unwrap();

        let config = DemoConfig {
            dialogue_path: Some(file.path().to_path_buf()),
            ..DemoConfig::default()
        };
        let mut session = DemoSession::new(config);
        session.handle_input(Input::Any);
        assert_eq!(session.handle_input(Input::Confirm), Signal::Continue);

        assert_eq!(session.active_screen(), Some(Screen::MainMenu));
        assert!(session.dialogue().is_none());
        assert!(session.last_error().unwrap().contains("malformed dialogue graph"));
        assert!(session.view().footer[0].starts_with("Dialogue unavailable"));
    }

    #[test]
    fn test_view_display() {
        let view = View {
            title: "Menu".to_string(),
            options: vec!["One".to_string(), "Two".to_string()],
            selected: Some(1),
            ..View::default()
        };
        assert_eq!(view.to_string(), "== Menu ==\n\n  One\n> Two\n");
    }
}
