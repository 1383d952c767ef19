//! Detection records returned by the device

use std::fmt;

use crate::landmarks::{Face, Hand, Pose};

/// Axis-aligned detection region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Block {
    /// Center X (pixels)
    pub x: i16,

    /// Center Y (pixels)
    pub y: i16,

    pub width: i16,

    pub height: i16,

    /// Learned ID (0 when the object was not learned)
    pub id: i16,

    /// Detection confidence (V2 only)
    pub confidence: u8,

    /// Learned name (V2 only)
    pub name: String,

    /// Decoded content such as QR text (V2 only)
    pub content: String,
}

impl Block {
    pub fn new(x: i16, y: i16, width: i16, height: i16, id: i16) -> Self {
        Self {
            x,
            y,
            width,
            height,
            id,
            ..Self::default()
        }
    }

    /// Attach the V2-only fields
    pub fn with_details(
        mut self,
        confidence: u8,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.confidence = confidence;
        self.name = name.into();
        self.content = content.into();
        self
    }

    /// Check if this object was taught on the device
    pub fn learned(&self) -> bool {
        self.id > 0
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block(x={}, y={}, w={}, h={}, ID={}",
            self.x, self.y, self.width, self.height, self.id
        )?;
        if self.confidence > 0 {
            write!(f, ", conf={}", self.confidence)?;
        }
        if !self.name.is_empty() {
            write!(f, ", name='{}'", self.name)?;
        }
        if !self.content.is_empty() {
            write!(f, ", content='{}'", self.content)?;
        }
        write!(f, ")")
    }
}

/// Directed line segment (tail -> head), used for line following
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Arrow {
    pub x_tail: i16,
    pub y_tail: i16,
    pub x_head: i16,
    pub y_head: i16,
    pub id: i16,
}

impl Arrow {
    pub fn new(x_tail: i16, y_tail: i16, x_head: i16, y_head: i16, id: i16) -> Self {
        Self {
            x_tail,
            y_tail,
            x_head,
            y_head,
            id,
        }
    }

    /// Heading in degrees: 0 points away from the camera, 90 points left
    pub fn direction(&self) -> f64 {
        let dx = f64::from(self.x_tail) - f64::from(self.x_head);
        let dy = f64::from(self.y_tail) - f64::from(self.y_head);
        dx.atan2(dy).to_degrees()
    }

    pub fn learned(&self) -> bool {
        self.id > 0
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arrow(tail=({},{}), head=({},{}), dir={:.1}, ID={})",
            self.x_tail,
            self.y_tail,
            self.x_head,
            self.y_head,
            self.direction(),
            self.id
        )
    }
}

/// Record kind tag, decides result-set bucketing
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DetectionKind {
    Block,
    Arrow,
    Face,
    Hand,
    Pose,
}

impl DetectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "BLOCK",
            Self::Arrow => "ARROW",
            Self::Face => "FACE",
            Self::Hand => "HAND",
            Self::Pose => "POSE",
        }
    }
}

impl fmt::Display for DetectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single decoded detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Block(Block),
    Arrow(Arrow),
    Face(Face),
    Hand(Hand),
    Pose(Pose),
}

impl Detection {
    pub fn kind(&self) -> DetectionKind {
        match self {
            Self::Block(_) => DetectionKind::Block,
            Self::Arrow(_) => DetectionKind::Arrow,
            Self::Face(_) => DetectionKind::Face,
            Self::Hand(_) => DetectionKind::Hand,
            Self::Pose(_) => DetectionKind::Pose,
        }
    }

    pub fn id(&self) -> i16 {
        match self {
            Self::Block(block) => block.id,
            Self::Arrow(arrow) => arrow.id,
            Self::Face(face) => face.block.id,
            Self::Hand(hand) => hand.block.id,
            Self::Pose(pose) => pose.block.id,
        }
    }

    pub fn learned(&self) -> bool {
        self.id() > 0
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block(block) => block.fmt(f),
            Self::Arrow(arrow) => arrow.fmt(f),
            Self::Face(face) => face.fmt(f),
            Self::Hand(hand) => hand.fmt(f),
            Self::Pose(pose) => pose.fmt(f),
        }
    }
}

impl From<Block> for Detection {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

impl From<Arrow> for Detection {
    fn from(arrow: Arrow) -> Self {
        Self::Arrow(arrow)
    }
}
