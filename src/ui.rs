//! Screen regions drawn each frame, some of which respond to clicks.
//!
//! Sprites are kept in draw order: later entries sit on top. A click is
//! offered to clickable sprites from the top down and the first one whose
//! rectangle contains the pointer consumes it, whether or not it has an
//! action for that button.

use ratatui::layout::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiAction {
    Start,
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickActions {
    pub primary: Option<UiAction>,
    pub secondary: Option<UiAction>,
}

impl ClickActions {
    /// Consumes clicks without doing anything.
    pub const BLOCKING: ClickActions = ClickActions {
        primary: None,
        secondary: None,
    };

    fn for_button(&self, button: PointerButton) -> Option<UiAction> {
        match button {
            PointerButton::Primary => self.primary,
            PointerButton::Secondary => self.secondary,
            PointerButton::Middle => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Drawable,
    Clickable(ClickActions),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    Board,
    Header,
    Banner(String),
    Popup(String),
    Button(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
    pub area: Rect,
    pub kind: SpriteKind,
    pub capability: Capability,
}

impl Sprite {
    pub fn drawable(area: Rect, kind: SpriteKind) -> Self {
        Sprite {
            area,
            kind,
            capability: Capability::Drawable,
        }
    }

    pub fn clickable(area: Rect, kind: SpriteKind, actions: ClickActions) -> Self {
        Sprite {
            area,
            kind,
            capability: Capability::Clickable(actions),
        }
    }

    /// Inclusive of the right and bottom edges.
    pub fn contains(&self, x: u16, y: u16) -> bool {
        let right = self.area.x as u32 + self.area.width as u32;
        let bottom = self.area.y as u32 + self.area.height as u32;
        x >= self.area.x && (x as u32) <= right && y >= self.area.y && (y as u32) <= bottom
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Missed,
    Consumed(Option<UiAction>),
}

#[derive(Debug, Default)]
pub struct SpriteLayer {
    sprites: Vec<Sprite>,
}

impl SpriteLayer {
    pub fn new() -> Self {
        SpriteLayer::default()
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn push(&mut self, sprite: Sprite) {
        self.sprites.push(sprite);
    }

    /// Sprites bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter()
    }

    pub fn on_pointer_down(&self, x: u16, y: u16, button: PointerButton) -> Hit {
        for sprite in self.sprites.iter().rev() {
            if let Capability::Clickable(actions) = sprite.capability {
                if sprite.contains(x, y) {
                    return Hit::Consumed(actions.for_button(button));
                }
            }
        }
        Hit::Missed
    }
}
