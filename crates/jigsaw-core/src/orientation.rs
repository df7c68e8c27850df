use serde::{Deserialize, Serialize};

/// Placed position of a side on the board, clockwise from the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideSlot {
    Top,
    Right,
    Bottom,
    Left,
}

impl SideSlot {
    pub const ALL: [SideSlot; 4] = [SideSlot::Top, SideSlot::Right, SideSlot::Bottom, SideSlot::Left];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            SideSlot::Top => 0,
            SideSlot::Right => 1,
            SideSlot::Bottom => 2,
            SideSlot::Left => 3,
        }
    }

    /// The slot a neighbor uses to mate with this one.
    #[inline]
    pub fn opposite(self) -> SideSlot {
        match self {
            SideSlot::Top => SideSlot::Bottom,
            SideSlot::Right => SideSlot::Left,
            SideSlot::Bottom => SideSlot::Top,
            SideSlot::Left => SideSlot::Right,
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("orientation index must be in 0..4, got {0}")]
pub struct InvalidOrientation(pub u8);

/// Quarter-turn orientation index of a piece on the solved board.
///
/// Orientation `k` means native side `k` becomes the placed top; the
/// placed (top, right, bottom, left) order is the native order `[0, 1, 2, 3]`
/// rotated left by `k`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Orientation(u8);

impl Orientation {
    pub const IDENTITY: Orientation = Orientation(0);

    pub fn new(quarter_turns: u8) -> Result<Self, InvalidOrientation> {
        if quarter_turns < 4 {
            Ok(Self(quarter_turns))
        } else {
            Err(InvalidOrientation(quarter_turns))
        }
    }

    #[inline]
    pub fn quarter_turns(self) -> u8 {
        self.0
    }

    /// Native side index that ends up in `slot`.
    #[inline]
    pub fn native_index(self, slot: SideSlot) -> usize {
        (slot.index() + self.0 as usize) % 4
    }

    /// Native side indices for (top, right, bottom, left).
    pub fn slot_map(self) -> [usize; 4] {
        cyclic_order(self.0 as usize)
    }
}

impl TryFrom<u8> for Orientation {
    type Error = InvalidOrientation;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Orientation::new(value)
    }
}

impl From<Orientation> for u8 {
    fn from(value: Orientation) -> Self {
        value.0
    }
}

/// `[0, 1, 2, 3]` rotated left by `offset`.
#[inline]
pub fn cyclic_order(offset: usize) -> [usize; 4] {
    let k = offset % 4;
    [k, (k + 1) % 4, (k + 2) % 4, (k + 3) % 4]
}
