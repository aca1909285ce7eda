//! Playground state: the tile map, the player and the overhead camera.
//!
//! World coordinates are in map units with the origin at the map's top-left
//! corner and y pointing down. Nothing in here knows about terminals.

use crossterm::style::Color;
use geom::Point;

/// Tiles per map side.
pub const MAP_SIZE: usize = 9;
/// World units per tile side.
pub const TILE_SIZE: f32 = 50.0;
/// Camera rotation limit, in degrees either way.
pub const MAX_ROTATION: f32 = 40.0;
/// Smallest camera zoom.
pub const MIN_ZOOM: f32 = 0.1;
/// Largest camera zoom.
pub const MAX_ZOOM: f32 = 3.0;
/// Zoom change per wheel notch.
pub const ZOOM_STEP: f32 = 0.05;

/// Checkbox caption when unchecked.
pub const CAPTION_UNCHECKED: &str = "Look at me, I'm a window!";
/// Checkbox caption when checked.
pub const CAPTION_CHECKED: &str = "Hey, you checked my box!";

/// Default map layout, row-major.
#[rustfmt::skip]
const LAYOUT: [u8; MAP_SIZE * MAP_SIZE] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 3, 0, 0, 0, 4, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 4, 1,
    1, 0, 2, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 0, 0, 0, 0, 0, 0, 0, 1,
    1, 1, 1, 1, 1, 1, 1, 1, 1,
];

/// A map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Code 0.
    Floor,
    /// Code 1.
    Wall,
    /// Code 2.
    Green,
    /// Code 3.
    Yellow,
    /// Code 4.
    Red,
    /// Any other code, or an index off the map.
    Unknown,
}

impl Tile {
    /// Decode a map byte.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Floor,
            1 => Self::Wall,
            2 => Self::Green,
            3 => Self::Yellow,
            4 => Self::Red,
            _ => Self::Unknown,
        }
    }

    /// Display color.
    pub fn color(self) -> Color {
        match self {
            Self::Floor => Color::DarkGrey,
            Self::Wall => Color::Blue,
            Self::Green => Color::Green,
            Self::Yellow => Color::Yellow,
            Self::Red => Color::Red,
            Self::Unknown => Color::Magenta,
        }
    }
}

/// The tile grid.
#[derive(Debug, Clone)]
pub struct Map {
    /// Tile codes, row-major.
    cells: [u8; MAP_SIZE * MAP_SIZE],
}

impl Default for Map {
    fn default() -> Self {
        Self { cells: LAYOUT }
    }
}

impl Map {
    /// Build a map from raw tile codes.
    pub fn from_codes(cells: [u8; MAP_SIZE * MAP_SIZE]) -> Self {
        Self { cells }
    }

    /// Tile at a flat index. Indices off the map are `Unknown`.
    pub fn tile(&self, index: isize) -> Tile {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.cells.get(i))
            .map_or(Tile::Unknown, |c| Tile::from_code(*c))
    }

    /// Tile under a world position, or `None` off the map.
    pub fn tile_at(&self, world: Point) -> Option<Tile> {
        let extent = TILE_SIZE * MAP_SIZE as f32;
        if !(0.0..extent).contains(&world.x) || !(0.0..extent).contains(&world.y) {
            return None;
        }
        let x = (world.x / TILE_SIZE) as usize;
        let y = (world.y / TILE_SIZE) as usize;
        Some(self.tile((y * MAP_SIZE + x) as isize))
    }
}

/// The player marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    /// World position.
    pub pos: Point,
    /// Units per second, per axis.
    pub speed: Point,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Point::new(100.0, 100.0),
            speed: Point::new(500.0, 500.0),
        }
    }
}

/// A 2D camera: `target` in world space appears at `offset` on screen,
/// rotated by `rotation` degrees and scaled by `zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World point under the screen offset.
    pub target: Point,
    /// Screen point the target is drawn at.
    pub offset: Point,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Scale factor.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Point::zero(),
            offset: Point::zero(),
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    /// Map a world point to screen space.
    pub fn to_screen(&self, world: Point) -> Point {
        (world - self.target).rotate(self.rotation).scale(self.zoom) + self.offset
    }

    /// Map a screen point to world space.
    pub fn to_world(&self, screen: Point) -> Point {
        (screen - self.offset).scale(1.0 / self.zoom).rotate(-self.rotation) + self.target
    }

    /// Forget rotation and zoom.
    pub fn reset(&mut self) {
        self.rotation = 0.0;
        self.zoom = 1.0;
    }
}

/// Input sampled for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Input {
    /// A is held.
    pub left: bool,
    /// D is held.
    pub right: bool,
    /// W is held.
    pub up: bool,
    /// S is held.
    pub down: bool,
    /// E is held.
    pub rotate_cw: bool,
    /// Q is held.
    pub rotate_ccw: bool,
    /// Wheel notches this frame, positive away from the user.
    pub wheel: f32,
    /// R was pressed.
    pub reset: bool,
    /// C was pressed.
    pub toggle_check: bool,
    /// Tab was pressed.
    pub toggle_split: bool,
}

/// Advance the player and camera by one frame of `dt` seconds.
pub fn update_frame(player: &mut Player, camera: &mut Camera, input: &Input, dt: f32) {
    if input.left {
        player.pos.x -= player.speed.x * dt;
    } else if input.right {
        player.pos.x += player.speed.x * dt;
    }
    if input.up {
        player.pos.y -= player.speed.y * dt;
    } else if input.down {
        player.pos.y += player.speed.y * dt;
    }

    camera.target = player.pos;

    if input.rotate_cw {
        camera.rotation += 1.0;
    } else if input.rotate_ccw {
        camera.rotation -= 1.0;
    }
    camera.rotation = camera.rotation.clamp(-MAX_ROTATION, MAX_ROTATION);

    camera.zoom = (camera.zoom + input.wheel * ZOOM_STEP).clamp(MIN_ZOOM, MAX_ZOOM);

    if input.reset {
        camera.reset();
    }
}

/// Everything the playground keeps between frames.
#[derive(Debug, Clone, Default)]
pub struct Game {
    /// The tile map.
    pub map: Map,
    /// The player.
    pub player: Player,
    /// The overhead camera.
    pub camera: Camera,
    /// Checkbox state.
    pub checked: bool,
    /// Split-screen mode.
    pub split: bool,
}

impl Game {
    /// A fresh game with the camera on the player.
    pub fn new(split: bool) -> Self {
        let player = Player::default();
        Self {
            camera: Camera {
                target: player.pos,
                ..Camera::default()
            },
            player,
            split,
            ..Self::default()
        }
    }

    /// Apply one frame of input.
    pub fn update(&mut self, input: &Input, dt: f32) {
        update_frame(&mut self.player, &mut self.camera, input, dt);
        if input.toggle_check {
            self.checked = !self.checked;
        }
        if input.toggle_split {
            self.split = !self.split;
            tracing::debug!(split = self.split, "view mode changed");
        }
    }

    /// The checkbox caption for the current state.
    pub fn caption(&self) -> &'static str {
        if self.checked {
            CAPTION_CHECKED
        } else {
            CAPTION_UNCHECKED
        }
    }
}
