//! Data-driven keybinding configuration
//!
//! All grid keybindings are defined as data in `KeyMap::default()`, not as
//! match arms in the event loop. The `[keybindings]` table of the config
//! file maps action names to keys and replaces the defaults for those
//! actions:
//!
//! ```toml
//! [keybindings]
//! copy_cell = "c"
//! page_down = "ctrl+d"
//! ```

use crate::grid::GridEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::{BTreeMap, HashMap};

/// A key combination (code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Parse `"q"`, `"ctrl+d"`, `"pagedown"`, `"shift+tab"` and the like
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        let mut parts: Vec<&str> = spec.split('+').collect();
        // "+" itself, or a binding ending in "+"
        if spec.ends_with('+') {
            parts.pop();
            parts.pop();
            parts.push("+");
        }
        let (key, mods) = parts.split_last()?;

        let mut modifiers = KeyModifiers::NONE;
        for m in mods {
            modifiers |= match m.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };

        Some(Self::normalize(code, modifiers))
    }

    /// Shift is implied by the character itself (`G`, `$`), so it is
    /// dropped for character keys
    fn normalize(code: KeyCode, modifiers: KeyModifiers) -> Self {
        match code {
            KeyCode::Char(_) => Self::new(code, modifiers.difference(KeyModifiers::SHIFT)),
            _ => Self::new(code, modifiers),
        }
    }
}

impl From<KeyEvent> for KeyBind {
    fn from(event: KeyEvent) -> Self {
        Self::normalize(event.code, event.modifiers)
    }
}

/// Semantic key actions: what a key means, not what key it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    FirstColumn,
    LastColumn,
    FirstRow,
    LastRow,
    PageUp,
    PageDown,
    CopyCell,
    Quit,
}

impl KeyAction {
    pub const ALL: [KeyAction; 12] = [
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::MoveLeft,
        KeyAction::MoveRight,
        KeyAction::FirstColumn,
        KeyAction::LastColumn,
        KeyAction::FirstRow,
        KeyAction::LastRow,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::CopyCell,
        KeyAction::Quit,
    ];

    /// Name used in the `[keybindings]` config table
    pub fn name(self) -> &'static str {
        match self {
            KeyAction::MoveUp => "move_up",
            KeyAction::MoveDown => "move_down",
            KeyAction::MoveLeft => "move_left",
            KeyAction::MoveRight => "move_right",
            KeyAction::FirstColumn => "first_column",
            KeyAction::LastColumn => "last_column",
            KeyAction::FirstRow => "first_row",
            KeyAction::LastRow => "last_row",
            KeyAction::PageUp => "page_up",
            KeyAction::PageDown => "page_down",
            KeyAction::CopyCell => "copy_cell",
            KeyAction::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    /// The grid event this action sends
    pub fn event(self) -> GridEvent {
        match self {
            KeyAction::MoveUp => GridEvent::MoveUp,
            KeyAction::MoveDown => GridEvent::MoveDown,
            KeyAction::MoveLeft => GridEvent::MoveLeft,
            KeyAction::MoveRight => GridEvent::MoveRight,
            KeyAction::FirstColumn => GridEvent::JumpFirstCol,
            KeyAction::LastColumn => GridEvent::JumpLastCol,
            KeyAction::FirstRow => GridEvent::JumpFirstRow,
            KeyAction::LastRow => GridEvent::JumpLastRow,
            KeyAction::PageUp => GridEvent::PageUp,
            KeyAction::PageDown => GridEvent::PageDown,
            KeyAction::CopyCell => GridEvent::CopyCell,
            KeyAction::Quit => GridEvent::Quit,
        }
    }
}

/// Keybinding configuration: maps key combos to semantic actions.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<KeyBind, KeyAction>,
}

impl KeyMap {
    /// Resolve a key event to a semantic action. Releases are ignored.
    pub fn resolve(&self, key: KeyEvent) -> Option<KeyAction> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        self.bindings.get(&KeyBind::from(key)).copied()
    }

    /// Resolve straight to the grid event
    pub fn event_for(&self, key: KeyEvent) -> Option<GridEvent> {
        self.resolve(key).map(KeyAction::event)
    }

    /// Defaults with the overrides from the config file applied.
    ///
    /// An override replaces every default key of that action. Unknown
    /// actions and unparseable keys are skipped and reported as warnings.
    pub fn from_config(overrides: &BTreeMap<String, String>) -> (Self, Vec<String>) {
        let mut keymap = Self::default();
        let mut warnings = Vec::new();

        for (name, key) in overrides {
            let Some(action) = KeyAction::from_name(name) else {
                warnings.push(format!("unknown keybinding action '{name}'"));
                continue;
            };
            let Some(bind) = KeyBind::parse(key) else {
                warnings.push(format!("invalid key '{key}' for '{name}'"));
                continue;
            };
            keymap.bindings.retain(|_, a| *a != action);
            keymap.bindings.insert(bind, action);
        }

        (keymap, warnings)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        let mut bind = |keys: &[KeyBind], action: KeyAction| {
            for key in keys {
                bindings.insert(*key, action);
            }
        };

        // ── Movement ─────────────────────────────────────────────
        bind(
            &[KeyBind::plain(KeyCode::Up), KeyBind::plain(KeyCode::Char('k'))],
            KeyAction::MoveUp,
        );
        bind(
            &[KeyBind::plain(KeyCode::Down), KeyBind::plain(KeyCode::Char('j'))],
            KeyAction::MoveDown,
        );
        bind(
            &[KeyBind::plain(KeyCode::Left), KeyBind::plain(KeyCode::Char('h'))],
            KeyAction::MoveLeft,
        );
        bind(
            &[KeyBind::plain(KeyCode::Right), KeyBind::plain(KeyCode::Char('l'))],
            KeyAction::MoveRight,
        );

        // ── Jumps ────────────────────────────────────────────────
        bind(
            &[
                KeyBind::plain(KeyCode::Char('0')),
                KeyBind::plain(KeyCode::Char('^')),
                KeyBind::plain(KeyCode::Home),
            ],
            KeyAction::FirstColumn,
        );
        bind(
            &[KeyBind::plain(KeyCode::Char('$')), KeyBind::plain(KeyCode::End)],
            KeyAction::LastColumn,
        );
        bind(&[KeyBind::plain(KeyCode::Char('g'))], KeyAction::FirstRow);
        bind(&[KeyBind::plain(KeyCode::Char('G'))], KeyAction::LastRow);

        // ── Paging ───────────────────────────────────────────────
        bind(
            &[
                KeyBind::plain(KeyCode::PageUp),
                KeyBind::ctrl('u'),
                KeyBind::ctrl('b'),
            ],
            KeyAction::PageUp,
        );
        bind(
            &[
                KeyBind::plain(KeyCode::PageDown),
                KeyBind::ctrl('d'),
                KeyBind::ctrl('f'),
            ],
            KeyAction::PageDown,
        );

        // ── Actions ──────────────────────────────────────────────
        bind(&[KeyBind::plain(KeyCode::Char('y'))], KeyAction::CopyCell);
        bind(
            &[
                KeyBind::plain(KeyCode::Char('q')),
                KeyBind::plain(KeyCode::Esc),
                KeyBind::ctrl('c'),
            ],
            KeyAction::Quit,
        );

        Self { bindings }
    }
}
