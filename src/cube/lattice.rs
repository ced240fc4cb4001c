use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt::{self, Display, Formatter};

use glam::{Mat4, Vec3};
use log::{debug, info};
use rand::Rng;

use crate::core::Color;
use crate::cube::Cubie;

// Lattice coordinates, one ternary digit per axis.
const LX: usize = 0; // left
const CX: usize = 1;
const RX: usize = 2; // right
const DY: usize = 0; // down
const CY: usize = 1;
const TY: usize = 2; // top
const BZ: usize = 0; // back
const CZ: usize = 1;
const FZ: usize = 2; // front

/// Linearized lattice index for coordinates in {0, 1, 2}.
const fn slot(x: usize, y: usize, z: usize) -> usize {
    x * 9 + y * 3 + z
}

/// Sticker palette, face order front, right, back, left, top, down.
const STICKER_FRONT: Color = Color::hex("0000FF");
const STICKER_RIGHT: Color = Color::hex("FF6A00");
const STICKER_BACK: Color = Color::hex("00C800");
const STICKER_LEFT: Color = Color::hex("FF0000");
const STICKER_TOP: Color = Color::hex("FFFFFF");
const STICKER_DOWN: Color = Color::hex("F2F200");

/// One quarter turn sweeps in 30 fixed increments.
pub const ROTATION_STEP: f32 = PI / 60.0;
const QUARTER_TURN: f32 = FRAC_PI_2;
const ANGLE_EPSILON: f32 = 1e-4;

/// The six rotatable layers of the puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Right,
    Back,
    Left,
    Top,
    Down,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Left,
        Face::Top,
        Face::Down,
    ];

    /// The 8 (from, to) slot reassignments of one clockwise quarter turn of
    /// this face. The center slot of the layer never moves and is absent.
    ///
    /// Each table is one cyclic walk around the layer; corners hop two
    /// positions, edges hop one. Hand-verified against a physical cube, the
    /// permutation tests below exercise every entry.
    const fn cycle(self) -> &'static [(usize, usize); 8] {
        match self {
            Face::Right => const { &[
                (slot(RX, TY, FZ), slot(RX, TY, BZ)),
                (slot(RX, TY, CZ), slot(RX, CY, BZ)),
                (slot(RX, TY, BZ), slot(RX, DY, BZ)),
                (slot(RX, CY, BZ), slot(RX, DY, CZ)),
                (slot(RX, DY, BZ), slot(RX, DY, FZ)),
                (slot(RX, DY, CZ), slot(RX, CY, FZ)),
                (slot(RX, DY, FZ), slot(RX, TY, FZ)),
                (slot(RX, CY, FZ), slot(RX, TY, CZ)),
            ] },
            Face::Front => const { &[
                (slot(LX, TY, FZ), slot(RX, TY, FZ)),
                (slot(CX, TY, FZ), slot(RX, CY, FZ)),
                (slot(RX, TY, FZ), slot(RX, DY, FZ)),
                (slot(RX, CY, FZ), slot(CX, DY, FZ)),
                (slot(RX, DY, FZ), slot(LX, DY, FZ)),
                (slot(CX, DY, FZ), slot(LX, CY, FZ)),
                (slot(LX, DY, FZ), slot(LX, TY, FZ)),
                (slot(LX, CY, FZ), slot(CX, TY, FZ)),
            ] },
            Face::Top => const { &[
                (slot(LX, TY, BZ), slot(RX, TY, BZ)),
                (slot(CX, TY, BZ), slot(RX, TY, CZ)),
                (slot(RX, TY, BZ), slot(RX, TY, FZ)),
                (slot(RX, TY, CZ), slot(CX, TY, FZ)),
                (slot(RX, TY, FZ), slot(LX, TY, FZ)),
                (slot(CX, TY, FZ), slot(LX, TY, CZ)),
                (slot(LX, TY, FZ), slot(LX, TY, BZ)),
                (slot(LX, TY, CZ), slot(CX, TY, BZ)),
            ] },
            Face::Left => const { &[
                (slot(LX, TY, BZ), slot(LX, TY, FZ)),
                (slot(LX, CY, BZ), slot(LX, TY, CZ)),
                (slot(LX, DY, BZ), slot(LX, TY, BZ)),
                (slot(LX, DY, CZ), slot(LX, CY, BZ)),
                (slot(LX, DY, FZ), slot(LX, DY, BZ)),
                (slot(LX, CY, FZ), slot(LX, DY, CZ)),
                (slot(LX, TY, FZ), slot(LX, DY, FZ)),
                (slot(LX, TY, CZ), slot(LX, CY, FZ)),
            ] },
            Face::Back => const { &[
                (slot(RX, TY, BZ), slot(LX, TY, BZ)),
                (slot(RX, CY, BZ), slot(CX, TY, BZ)),
                (slot(RX, DY, BZ), slot(RX, TY, BZ)),
                (slot(CX, DY, BZ), slot(RX, CY, BZ)),
                (slot(LX, DY, BZ), slot(RX, DY, BZ)),
                (slot(LX, CY, BZ), slot(CX, DY, BZ)),
                (slot(LX, TY, BZ), slot(LX, DY, BZ)),
                (slot(CX, TY, BZ), slot(LX, CY, BZ)),
            ] },
            Face::Down => const { &[
                (slot(RX, DY, BZ), slot(LX, DY, BZ)),
                (slot(RX, DY, CZ), slot(CX, DY, BZ)),
                (slot(RX, DY, FZ), slot(RX, DY, BZ)),
                (slot(CX, DY, FZ), slot(RX, DY, CZ)),
                (slot(LX, DY, FZ), slot(RX, DY, FZ)),
                (slot(LX, DY, CZ), slot(CX, DY, FZ)),
                (slot(LX, DY, BZ), slot(LX, DY, FZ)),
                (slot(CX, DY, BZ), slot(LX, DY, CZ)),
            ] },
        }
    }

    /// World-axis rotation for an incremental sweep of this face.
    ///
    /// Front/back turn about Z, left/right about X, top/down about Y.
    /// Opposite faces use opposite signs so "clockwise" always means
    /// clockwise when looking at that face from outside.
    fn sweep_rotation(self, inverted: bool, angle: f32) -> Mat4 {
        let angle = if inverted { angle } else { -angle };
        match self {
            Face::Front => Mat4::from_rotation_z(angle),
            Face::Back => Mat4::from_rotation_z(-angle),
            Face::Right => Mat4::from_rotation_x(angle),
            Face::Left => Mat4::from_rotation_x(-angle),
            Face::Top => Mat4::from_rotation_y(angle),
            Face::Down => Mat4::from_rotation_y(-angle),
        }
    }

    /// True when the lattice coordinate (x, y, z) belongs to this layer.
    fn contains(self, x: usize, y: usize, z: usize) -> bool {
        match self {
            Face::Right => x == RX,
            Face::Left => x == LX,
            Face::Top => y == TY,
            Face::Down => y == DY,
            Face::Front => z == FZ,
            Face::Back => z == BZ,
        }
    }
}

impl Display for Face {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::Front => "Front",
            Face::Right => "Right",
            Face::Back => "Back",
            Face::Left => "Left",
            Face::Top => "Top",
            Face::Down => "Down",
        };
        write!(f, "{name}")
    }
}

/// A quarter turn of one layer, normal or inverted direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub face: Face,
    pub inverted: bool,
}

impl Move {
    pub fn new(face: Face, inverted: bool) -> Self {
        Self { face, inverted }
    }

    pub fn inverse(self) -> Self {
        Self {
            face: self.face,
            inverted: !self.inverted,
        }
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.face, if self.inverted { "'" } else { "" })
    }
}

/// A move was requested while another one is still sweeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRejected;

impl Display for MoveRejected {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "a move is already in progress")
    }
}

impl std::error::Error for MoveRejected {}

struct ActiveMove {
    mv: Move,
    swept: f32,
}

/// The 3x3x3 puzzle: 27 cubies in a fixed ownership array indexed by
/// `x*9 + y*3 + z` with x, y, z in {0, 1, 2} meaning left/center/right,
/// down/center/top, back/center/front.
///
/// Every slot always holds exactly one cubie. A move rotates the transforms
/// of one layer's 9 cubies over 30 ticks and, on completion, permutes slot
/// ownership among the 8 non-center slots of that layer.
pub struct RubiksCube {
    cubies: [Cubie; 27],
    pub transform: Mat4,
    active: Option<ActiveMove>,
}

impl RubiksCube {
    pub fn new() -> Self {
        // Slight shrink leaves visible gaps between the cubies.
        let shrink = Mat4::from_scale(Vec3::splat(0.99));

        let cubies = std::array::from_fn(|index| {
            let (x, y, z) = (index / 9, (index / 3) % 3, index % 3);

            let front = if z == FZ { STICKER_FRONT } else { Color::BLACK };
            let right = if x == RX { STICKER_RIGHT } else { Color::BLACK };
            let back = if z == BZ { STICKER_BACK } else { Color::BLACK };
            let left = if x == LX { STICKER_LEFT } else { Color::BLACK };
            let top = if y == TY { STICKER_TOP } else { Color::BLACK };
            let down = if y == DY { STICKER_DOWN } else { Color::BLACK };

            let translate = Mat4::from_translation(Vec3::new(
                x as f32 - 1.0,
                y as f32 - 1.0,
                z as f32 - 1.0,
            ));

            Cubie::new([front, right, back, left, top, down], translate * shrink)
        });

        Self {
            cubies,
            transform: Mat4::IDENTITY,
            active: None,
        }
    }

    pub fn cubie(&self, index: usize) -> &Cubie {
        &self.cubies[index]
    }

    /// The 9 lattice indices of the layer a move affects, independent of the
    /// move direction.
    pub fn layer_indices(face: Face) -> [usize; 9] {
        let mut indices = [0usize; 9];
        let mut n = 0;
        for x in 0..3 {
            for y in 0..3 {
                for z in 0..3 {
                    if face.contains(x, y, z) {
                        indices[n] = slot(x, y, z);
                        n += 1;
                    }
                }
            }
        }
        debug_assert_eq!(n, 9);
        indices
    }

    pub fn is_rotating(&self) -> bool {
        self.active.is_some()
    }

    /// Angle swept so far by the move in progress.
    pub fn progress(&self) -> Option<f32> {
        self.active.as_ref().map(|a| a.swept)
    }

    /// Begin a quarter-turn sweep. Rejected while another move is rotating;
    /// there is no queueing.
    pub fn start_move(&mut self, mv: Move) -> Result<(), MoveRejected> {
        if self.active.is_some() {
            debug!("rejected move {mv}: layer still rotating");
            return Err(MoveRejected);
        }
        info!("move {mv} started");
        self.active = Some(ActiveMove { mv, swept: 0.0 });
        Ok(())
    }

    /// Advance the active sweep by one fixed increment. On reaching the full
    /// quarter turn the slot permutation is committed exactly once and the
    /// cube returns to idle.
    pub fn tick(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let mv = active.mv;

        let step = ROTATION_STEP.min(QUARTER_TURN - active.swept);
        active.swept += step;
        let done = active.swept >= QUARTER_TURN - ANGLE_EPSILON;

        self.rotate_layer(mv, step);
        if done {
            self.commit_permutation(mv);
            self.active = None;
            info!("move {mv} committed");
        }
    }

    /// Apply one move instantly: the full 90 degree rotation plus the slot
    /// permutation in a single call. Rejected while a sweep is active.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), MoveRejected> {
        if self.active.is_some() {
            return Err(MoveRejected);
        }
        self.rotate_layer(mv, QUARTER_TURN);
        self.commit_permutation(mv);
        Ok(())
    }

    /// Shuffle with `count` uniformly random instant moves.
    pub fn scramble<R: Rng>(&mut self, rng: &mut R, count: usize) -> Result<(), MoveRejected> {
        for _ in 0..count {
            let face = Face::ALL[rng.gen_range(0..Face::ALL.len())];
            let mv = Move::new(face, rng.gen_bool(0.5));
            self.apply_move(mv)?;
        }
        info!("scrambled with {count} moves");
        Ok(())
    }

    /// Rotate the transforms of the affected layer's cubies by `delta_angle`
    /// around the face's world axis. Purely visual, lattice ownership is
    /// untouched.
    fn rotate_layer(&mut self, mv: Move, delta_angle: f32) {
        let rotation = mv.face.sweep_rotation(mv.inverted, delta_angle);
        for index in Self::layer_indices(mv.face) {
            self.cubies[index].rotate(rotation);
        }
    }

    /// Reassign cubie ownership among the 8 non-center slots of the layer.
    /// For an inverted move the cycle table is read in reverse.
    fn commit_permutation(&mut self, mv: Move) {
        let snapshot = self.cubies.clone();
        for &(a, b) in mv.face.cycle() {
            let (from, to) = if mv.inverted { (b, a) } else { (a, b) };
            self.cubies[to] = snapshot[from].clone();
        }
    }

    /// All 324 world-space triangles of the puzzle.
    pub fn triangles(&self) -> Vec<crate::core::Triangle> {
        self.cubies
            .iter()
            .flat_map(|c| c.world_triangles(self.transform))
            .collect()
    }
}

impl Default for RubiksCube {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Snapshot of which cubie (by sticker colors) sits in which slot.
    fn ownership(cube: &RubiksCube) -> Vec<[Color; 6]> {
        (0..27).map(|i| *cube.cubie(i).face_colors()).collect()
    }

    #[test]
    fn every_layer_has_nine_slots() {
        for face in Face::ALL {
            let indices = RubiksCube::layer_indices(face);
            let mut sorted = indices;
            sorted.sort_unstable();
            sorted.windows(2).for_each(|w| assert_ne!(w[0], w[1]));
            assert!(indices.iter().all(|&i| i < 27));
        }
    }

    #[test]
    fn cycle_tables_stay_inside_their_layer() {
        for face in Face::ALL {
            let layer = RubiksCube::layer_indices(face);
            for &(from, to) in face.cycle() {
                assert!(layer.contains(&from));
                assert!(layer.contains(&to));
                assert_ne!(from, to);
            }
        }
    }

    #[test]
    fn move_then_inverse_restores_the_lattice() {
        for face in Face::ALL {
            let mut cube = RubiksCube::new();
            let before = ownership(&cube);

            let mv = Move::new(face, false);
            cube.apply_move(mv).unwrap();
            assert_ne!(before, ownership(&cube));

            cube.apply_move(mv.inverse()).unwrap();
            assert_eq!(before, ownership(&cube), "face {face}");
        }
    }

    #[test]
    fn four_quarter_turns_are_the_identity() {
        for face in Face::ALL {
            let mut cube = RubiksCube::new();
            let before = ownership(&cube);

            for _ in 0..4 {
                cube.apply_move(Move::new(face, false)).unwrap();
            }
            assert_eq!(before, ownership(&cube), "face {face}");
        }
    }

    #[test]
    fn center_slot_never_moves() {
        let mut cube = RubiksCube::new();
        let right_center = slot(RX, CY, CZ);
        let before = *cube.cubie(right_center).face_colors();

        cube.apply_move(Move::new(Face::Right, false)).unwrap();
        assert_eq!(before, *cube.cubie(right_center).face_colors());
    }

    #[test]
    fn sweep_reaches_a_quarter_turn_in_thirty_ticks() {
        let mut cube = RubiksCube::new();
        let before = ownership(&cube);
        let mv = Move::new(Face::Right, false);
        cube.start_move(mv).unwrap();

        for _ in 0..29 {
            cube.tick();
        }
        assert!(cube.is_rotating());
        let swept = cube.progress().unwrap();
        assert!((swept - 29.0 * ROTATION_STEP).abs() < 1e-5);

        cube.tick();
        assert!(!cube.is_rotating());

        // The committed lattice must equal the instant version of the move.
        let mut reference = RubiksCube::new();
        reference.apply_move(mv).unwrap();
        assert_eq!(ownership(&cube), ownership(&reference));
        assert_ne!(before, ownership(&cube));
    }

    #[test]
    fn thirty_steps_accumulate_to_half_pi() {
        let total = (0..30).fold(0.0f32, |acc, _| acc + ROTATION_STEP);
        assert!((total - FRAC_PI_2).abs() < 1e-4);
    }

    #[test]
    fn moves_are_rejected_while_rotating() {
        let mut cube = RubiksCube::new();
        cube.start_move(Move::new(Face::Top, false)).unwrap();

        assert_eq!(
            cube.start_move(Move::new(Face::Left, false)),
            Err(MoveRejected)
        );
        assert_eq!(cube.apply_move(Move::new(Face::Left, false)), Err(MoveRejected));

        // Finish the sweep, then moves are accepted again.
        while cube.is_rotating() {
            cube.tick();
        }
        assert!(cube.start_move(Move::new(Face::Left, false)).is_ok());
    }

    #[test]
    fn sweep_rotation_carries_the_layer_through_ninety_degrees() {
        let mut cube = RubiksCube::new();
        let start = cube
            .cubie(slot(RX, TY, CZ))
            .transform
            .transform_point3(Vec3::ZERO);

        cube.start_move(Move::new(Face::Right, false)).unwrap();
        while cube.is_rotating() {
            cube.tick();
        }

        // The right layer turned -90 degrees about X, so the cubie that sat
        // top-center now sits back-center, with its position rotated
        // (x, y, z) -> (x, z, -y). The permutation must agree and hand that
        // same cubie to the back-center slot.
        let end = cube
            .cubie(slot(RX, CY, BZ))
            .transform
            .transform_point3(Vec3::ZERO);
        let expected = Vec3::new(start.x, start.z, -start.y);
        assert!((end - expected).length() < 1e-3);
    }

    #[test]
    fn scramble_keeps_every_cubie_exactly_once() {
        let mut cube = RubiksCube::new();
        let mut rng = StdRng::seed_from_u64(42);
        cube.scramble(&mut rng, 25).unwrap();

        let mut reference = ownership(&RubiksCube::new());
        let mut scrambled = ownership(&cube);
        // Same multiset of cubie identities, merely relocated.
        let key = |c: &[Color; 6]| {
            c.iter()
                .map(|c| c.to_u32())
                .fold(String::new(), |acc, v| format!("{acc}:{v:06x}"))
        };
        reference.sort_by_key(key);
        scrambled.sort_by_key(key);
        assert_eq!(reference, scrambled);
    }
}
