//! One discrete step of the simulation.
//!
//! `advance_tick` never mutates the session it is given: it clones, applies
//! the tick and hands back the new session along with a `Step` describing what
//! happened. Collisions and a full board are ordinary outcomes recorded on the
//! session, not errors.

use rand::Rng;
use serde::Deserialize;

use crate::board::{Board, Cell, Direction, Pos, PosDelta, Size, FOOD};
use crate::rng::random_select;

/// What happens when the head leaves the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    #[default]
    Wall,
    Wrap,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    pub boundary: Boundary,
    /// Length gained per food.
    pub growth: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            boundary: Boundary::Wall,
            growth: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndCause {
    Wall,
    SelfCollision,
    /// Food was eaten and no empty cell is left for the next one.
    BoardFull,
    LengthFilled,
}

impl EndCause {
    pub fn is_win(&self) -> bool {
        matches!(self, EndCause::BoardFull | EndCause::LengthFilled)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// Ate food, with score increment
    Fed { gained: u32 },
    Ended(EndCause),
    /// The session was already over; nothing changed.
    Stalled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    board: Board,
    head: Pos,
    length: u32,
    score: u32,
    ended: Option<EndCause>,
}

impl Session {
    /// Fresh game: the head sits in the middle facing East with the body laid
    /// out behind it, and one food is dropped on a random empty cell.
    pub fn new(size: Size, start_length: u32, rng: &mut impl Rng) -> Self {
        let length = start_length.clamp(1, size.width as u32 / 2 + 1);
        let head = Pos {
            x: size.width / 2,
            y: size.height / 2,
        };

        let mut board = Board::new(size.width, size.height);
        for i in 0..length {
            let segment = Pos {
                x: head.x - i as u16,
                y: head.y,
            };
            board.stamp(segment, (length - i) as i32);
        }

        let mut session = Session::from_parts(board, head, length);
        if place_food_randomly(&mut session.board, rng).is_none() {
            session.ended = Some(EndCause::BoardFull);
        }
        session
    }

    /// Session around an existing board; `head` must hold the largest tag.
    pub fn from_parts(board: Board, head: Pos, length: u32) -> Self {
        Session {
            board,
            head,
            length,
            score: 0,
            ended: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn head(&self) -> Pos {
        self.head
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn end_cause(&self) -> Option<EndCause> {
        self.ended
    }

    pub fn is_game_over(&self) -> bool {
        self.ended.is_some()
    }

    pub fn is_win(&self) -> bool {
        self.ended.is_some_and(|cause| cause.is_win())
    }

    fn ended_with(&self, cause: EndCause) -> (Session, Step) {
        let mut over = self.clone();
        over.ended = Some(cause);
        (over, Step::Ended(cause))
    }
}

/// Drop a food on a uniformly chosen empty cell. `None` when the board has no
/// empty cell left.
pub fn place_food_randomly(board: &mut Board, rng: &mut impl Rng) -> Option<Pos> {
    let empty = board.empty_cells();
    let pos = *random_select(rng, &empty)?;
    board.stamp(pos, FOOD);
    Some(pos)
}

/// Tag for a segment with `life` ticks left, saturating at `i32::MAX`.
fn segment_tag(life: u32) -> i32 {
    i32::try_from(life).unwrap_or(i32::MAX)
}

/// Advance the session by one tick in `direction`.
///
/// Losses leave the board as it was before the tick so the crash stays
/// visible; wins keep the board the winning move produced.
pub fn advance_tick(
    session: &Session,
    direction: Direction,
    rules: &Rules,
    rng: &mut impl Rng,
) -> (Session, Step) {
    if session.is_game_over() {
        return (session.clone(), Step::Stalled);
    }

    let mut next = session.clone();
    next.board.age_snake_cells();

    let size = next.board.size();
    let delta = PosDelta::from(direction);
    let candidate = match rules.boundary {
        Boundary::Wall => match session.head.bounded_add(delta, size) {
            Some(pos) => pos,
            None => return session.ended_with(EndCause::Wall),
        },
        Boundary::Wrap => session.head.wrapped_add(delta, size),
    };

    let fed = match next.board.cell(candidate) {
        Cell::Snake(_) => return session.ended_with(EndCause::SelfCollision),
        Cell::Food => {
            let gained = next.length;
            next.score += gained;
            next.length = next.length.saturating_add(rules.growth);
            next.board.extend_snake_cells(segment_tag(rules.growth));
            Some(gained)
        }
        Cell::Empty => None,
    };

    next.board.stamp(candidate, segment_tag(next.length));
    next.head = candidate;

    if fed.is_some() && place_food_randomly(&mut next.board, rng).is_none() {
        next.ended = Some(EndCause::BoardFull);
        return (next, Step::Ended(EndCause::BoardFull));
    }

    if next.length as usize >= next.board.cell_count() {
        next.ended = Some(EndCause::LengthFilled);
        return (next, Step::Ended(EndCause::LengthFilled));
    }

    let step = match fed {
        Some(gained) => Step::Fed { gained },
        None => Step::Moved,
    };
    (next, step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::EMPTY;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    /// Session whose snake occupies `segments`, head first, tagged
    /// `length..=1` from head to tail.
    fn snake_session(width: u16, height: u16, segments: &[(u16, u16)], food: Option<(u16, u16)>) -> Session {
        let mut board = Board::new(width, height);
        let length = segments.len() as u32;
        for (i, (x, y)) in segments.iter().enumerate() {
            board.stamp(Pos::new(*x, *y), (length as usize - i) as i32);
        }
        if let Some((x, y)) = food {
            board.stamp(Pos::new(x, y), FOOD);
        }
        let (hx, hy) = segments[0];
        Session::from_parts(board, Pos::new(hx, hy), length)
    }

    fn max_tag(board: &Board) -> i32 {
        board.positions().map(|p| board.tag(p)).max().unwrap_or(EMPTY)
    }

    #[test]
    fn test_new_session_layout() {
        let size = Size {
            width: 10,
            height: 6,
        };
        let session = Session::new(size, 3, &mut rng());

        assert_eq!(session.head(), Pos::new(5, 3));
        assert_eq!(session.length(), 3);
        assert_eq!(session.score(), 0);
        assert!(!session.is_game_over());
        assert_eq!(session.board().tag(Pos::new(5, 3)), 3);
        assert_eq!(session.board().tag(Pos::new(4, 3)), 2);
        assert_eq!(session.board().tag(Pos::new(3, 3)), 1);
        assert_eq!(session.board().snake_cell_count(), 3);
        assert_eq!(session.board().food_count(), 1);
    }

    #[test]
    fn test_new_session_clamps_length() {
        let size = Size {
            width: 4,
            height: 4,
        };
        let session = Session::new(size, 10, &mut rng());
        assert_eq!(session.length(), 3);
        assert_eq!(session.board().snake_cell_count(), 3);
    }

    #[test]
    fn test_plain_move() {
        let session = snake_session(5, 5, &[(2, 2), (1, 2)], Some((0, 0)));
        let (next, step) = advance_tick(&session, Direction::East, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Moved);
        assert_eq!(next.head(), Pos::new(3, 2));
        assert_eq!(next.board().tag(Pos::new(3, 2)), 2);
        assert_eq!(next.board().tag(Pos::new(2, 2)), 1);
        assert_eq!(next.board().tag(Pos::new(1, 2)), EMPTY);
        assert_eq!(next.board().food(), Some(Pos::new(0, 0)));
        // input untouched
        assert_eq!(session.head(), Pos::new(2, 2));
    }

    #[test]
    fn test_eating_food() {
        let session = snake_session(5, 5, &[(2, 2), (1, 2)], Some((3, 2)));
        let (next, step) = advance_tick(&session, Direction::East, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Fed { gained: 2 });
        assert_eq!(next.head(), Pos::new(3, 2));
        assert_eq!(next.length(), 3);
        assert_eq!(next.score(), 2);
        assert!(!next.is_game_over());
        assert_eq!(next.board().food_count(), 1);

        let food = next.board().food().unwrap();
        assert_ne!(food, Pos::new(3, 2));
        assert_eq!(next.board().cell(food), Cell::Food);
        assert_eq!(max_tag(next.board()), 3);
        assert_eq!(next.board().tag(next.head()), 3);
    }

    #[test]
    fn test_growth_catches_up() {
        let rules = Rules {
            boundary: Boundary::Wall,
            growth: 2,
        };
        let session = snake_session(12, 1, &[(2, 0), (1, 0)], Some((3, 0)));
        let (mut session, step) = advance_tick(&session, Direction::East, &rules, &mut rng());
        assert_eq!(step, Step::Fed { gained: 2 });
        assert_eq!(session.length(), 4);
        assert_eq!(session.board().snake_cell_count(), 2);

        // Clear the respawned food so the next ticks are plain moves.
        if let Some(food) = session.board.food() {
            session.board.stamp(food, EMPTY);
        }

        let (session, _) = advance_tick(&session, Direction::East, &rules, &mut rng());
        assert_eq!(session.board().snake_cell_count(), 3);
        let (session, _) = advance_tick(&session, Direction::East, &rules, &mut rng());
        assert_eq!(session.board().snake_cell_count(), 4);
        let (session, _) = advance_tick(&session, Direction::East, &rules, &mut rng());
        assert_eq!(session.board().snake_cell_count(), 4);
        assert_eq!(session.board().tag(session.head()), 4);
    }

    #[test]
    fn test_body_count_matches_length_while_cruising() {
        let mut session = snake_session(10, 10, &[(4, 4), (3, 4), (2, 4)], None);
        let path = [
            Direction::East,
            Direction::East,
            Direction::South,
            Direction::South,
            Direction::West,
            Direction::West,
            Direction::North,
        ];
        for dir in path {
            let (next, step) = advance_tick(&session, dir, &Rules::default(), &mut rng());
            assert_eq!(step, Step::Moved);
            assert_eq!(next.board().snake_cell_count(), next.length() as usize);
            assert_eq!(next.board().tag(next.head()), max_tag(next.board()));
            session = next;
        }
    }

    #[test]
    fn test_wall_is_a_loss() {
        let session = snake_session(3, 3, &[(2, 1), (1, 1)], Some((0, 0)));
        let (next, step) = advance_tick(&session, Direction::East, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Ended(EndCause::Wall));
        assert!(next.is_game_over());
        assert!(!next.is_win());
        assert_eq!(next.board(), session.board());
    }

    #[test]
    fn test_wrap_rule_continues() {
        let rules = Rules {
            boundary: Boundary::Wrap,
            growth: 1,
        };
        let session = snake_session(3, 3, &[(2, 1), (1, 1)], Some((0, 0)));
        let (next, step) = advance_tick(&session, Direction::East, &rules, &mut rng());

        assert_eq!(step, Step::Moved);
        assert_eq!(next.head(), Pos::new(0, 1));
        assert!(!next.is_game_over());
    }

    #[test]
    fn test_self_collision() {
        // Tail at (2,0), head at (1,1) heading East.
        let session = snake_session(3, 3, &[(1, 1), (0, 1), (0, 0), (1, 0), (2, 0)], None);
        let (next, step) = advance_tick(&session, Direction::North, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Ended(EndCause::SelfCollision));
        assert!(next.is_game_over());
        assert!(!next.is_win());
    }

    #[test]
    fn test_chasing_the_tail_is_legal() {
        let session = snake_session(3, 3, &[(1, 1), (0, 1), (0, 0), (1, 0)], None);
        let (next, step) = advance_tick(&session, Direction::North, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Moved);
        assert_eq!(next.head(), Pos::new(1, 0));
        assert_eq!(next.board().snake_cell_count(), 4);
    }

    #[test]
    fn test_terminal_session_is_stalled() {
        let session = snake_session(3, 3, &[(2, 1)], None);
        let (over, _) = advance_tick(&session, Direction::East, &Rules::default(), &mut rng());
        assert!(over.is_game_over());

        let (again, step) = advance_tick(&over, Direction::West, &Rules::default(), &mut rng());
        assert_eq!(step, Step::Stalled);
        assert_eq!(again, over);
    }

    #[test]
    fn test_filling_the_board_wins() {
        let session = snake_session(2, 1, &[(0, 0)], Some((1, 0)));
        let (next, step) = advance_tick(&session, Direction::East, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Ended(EndCause::LengthFilled));
        assert_eq!(next.length(), 2);
        assert!(next.is_game_over());
        assert!(next.is_win());
    }

    #[test]
    fn test_no_room_for_food_wins() {
        // Mid-growth snake: nothing decays to empty this tick.
        let mut board = Board::new(3, 1);
        board.stamp(Pos::new(0, 0), 2);
        board.stamp(Pos::new(1, 0), 3);
        board.stamp(Pos::new(2, 0), FOOD);
        let session = Session::from_parts(board, Pos::new(1, 0), 3);

        let (next, step) = advance_tick(&session, Direction::East, &Rules::default(), &mut rng());

        assert_eq!(step, Step::Ended(EndCause::BoardFull));
        assert!(next.is_win());
        assert_eq!(next.board().food_count(), 0);
        assert_eq!(next.board().empty_cells().len(), 0);
    }

    #[test]
    fn test_food_never_respawns_on_snake() {
        let rules = Rules::default();
        let mut rng = rng();
        let mut session = snake_session(6, 6, &[(2, 3), (1, 3)], None);
        use Direction::*;
        let path = [East, East, East, North, North, North, West, West, West, South, South, West];

        for (tick, dir) in path.into_iter().enumerate() {
            let ahead = session
                .head()
                .bounded_add(dir.into(), session.board().size())
                .unwrap();
            if let Some(food) = session.board.food() {
                session.board.stamp(food, EMPTY);
            }
            session.board.stamp(ahead, FOOD);

            let (next, step) = advance_tick(&session, dir, &rules, &mut rng);
            assert!(matches!(step, Step::Fed { .. }), "tick {tick}: {step:?}");
            assert!(next.board().food_count() <= 1);
            let food = next.board().food().unwrap();
            assert_eq!(next.board().cell(food), Cell::Food);
            assert_ne!(food, next.head());
            session = next;
        }
        assert_eq!(session.length(), 14);
    }

    #[test]
    fn test_huge_growth_saturates() {
        let session = snake_session(5, 5, &[(2, 2), (1, 2)], Some((3, 2)));
        let rules = Rules {
            boundary: Boundary::Wall,
            growth: u32::MAX,
        };

        let (next, step) = advance_tick(&session, Direction::East, &rules, &mut rng());

        assert_eq!(step, Step::Ended(EndCause::LengthFilled));
        assert_eq!(next.length(), u32::MAX);
        assert_eq!(next.board().tag(Pos::new(3, 2)), i32::MAX);
        assert!(next
            .board()
            .positions()
            .all(|pos| next.board().tag(pos) >= FOOD));
        assert_eq!(next.board().snake_cell_count(), 2);
    }

    #[test]
    fn test_place_food_reaches_every_empty_cell() {
        let mut picked = Vec::new();
        for seed in 0..32 {
            let mut board = Board::new(3, 1);
            board.stamp(Pos::new(1, 0), 1);
            let pos = place_food_randomly(&mut board, &mut StdRng::seed_from_u64(seed));
            assert_ne!(pos, Some(Pos::new(1, 0)));
            picked.push(pos);
        }
        assert!(picked.contains(&Some(Pos::new(0, 0))));
        assert!(picked.contains(&Some(Pos::new(2, 0))));
    }

    #[test]
    fn test_place_food_on_full_board() {
        let mut board = Board::new(2, 1);
        board.stamp(Pos::new(0, 0), 1);
        board.stamp(Pos::new(1, 0), 2);
        assert_eq!(place_food_randomly(&mut board, &mut rng()), None);
        assert_eq!(board.food_count(), 0);
    }

    #[test]
    fn test_place_food_uses_only_empty_cell() {
        let mut board = Board::new(3, 1);
        board.stamp(Pos::new(0, 0), 1);
        board.stamp(Pos::new(2, 0), 2);
        assert_eq!(place_food_randomly(&mut board, &mut rng()), Some(Pos::new(1, 0)));
        assert_eq!(board.tag(Pos::new(1, 0)), FOOD);
    }
}
