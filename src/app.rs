use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::Frame;
use std::collections::VecDeque;
use std::time::Duration;

use crate::board::Direction;
use crate::config::Config;
use crate::controller::{GameLoop, Phase};
use crate::render;
use crate::ui::{Hit, PointerButton, SpriteLayer, UiAction};

const FPS_WINDOW: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Steer(Direction),
    Act(UiAction),
}

/// What a key means in the given phase.
pub fn key_intent(key: KeyEvent, phase: Phase) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Act(UiAction::Quit));
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
            return Some(Intent::Act(UiAction::Quit))
        }
        _ => {}
    }

    match phase {
        Phase::Idle => match key.code {
            KeyCode::Char(' ') => Some(Intent::Act(UiAction::Start)),
            _ => None,
        },
        Phase::Running => match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                Some(Intent::Steer(Direction::North))
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(Intent::Steer(Direction::South))
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(Intent::Steer(Direction::West))
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(Intent::Steer(Direction::East))
            }
            KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Act(UiAction::Restart)),
            _ => None,
        },
        Phase::Terminal(_) => match key.code {
            KeyCode::Char(' ') | KeyCode::Char('r') | KeyCode::Char('R') => {
                Some(Intent::Act(UiAction::Restart))
            }
            _ => None,
        },
    }
}

pub fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Right => PointerButton::Secondary,
    }
}

/// Rolling average over the last few frame times.
#[derive(Debug, Default)]
pub struct FrameStats {
    deltas: VecDeque<Duration>,
}

impl FrameStats {
    pub fn add(&mut self, delta: Duration) {
        self.deltas.push_back(delta);
        if self.deltas.len() > FPS_WINDOW {
            self.deltas.pop_front();
        }
    }

    pub fn fps(&self) -> f64 {
        let total: Duration = self.deltas.iter().sum();
        if total.is_zero() {
            return 0.0;
        }
        self.deltas.len() as f64 / total.as_secs_f64()
    }
}

pub struct App {
    game: GameLoop<StdRng>,
    layer: SpriteLayer,
    frames: FrameStats,
    exit: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        App {
            game: GameLoop::new(config, StdRng::from_entropy()),
            layer: SpriteLayer::new(),
            frames: FrameStats::default(),
            exit: false,
        }
    }

    pub fn should_exit(&self) -> bool {
        self.exit
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key_intent(key, self.game.phase()) {
            Some(Intent::Steer(direction)) => self.game.on_direction(direction),
            Some(Intent::Act(action)) => self.apply(action),
            None => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let MouseEventKind::Down(button) = mouse.kind else {
            return;
        };
        let hit = self
            .layer
            .on_pointer_down(mouse.column, mouse.row, pointer_button(button));
        debug!("Click at ({}, {}): {:?}", mouse.column, mouse.row, hit);
        if let Hit::Consumed(Some(action)) = hit {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Start => self.game.start(),
            UiAction::Restart => self.game.restart(),
            UiAction::Quit => {
                info!("Quit requested");
                self.exit = true;
            }
        }
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.frames.add(elapsed);
        self.game.frame(elapsed);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let snapshot = self.game.snapshot();
        render::render(frame, &snapshot, self.frames.fps(), &mut self.layer);
    }
}
