//! Query results grouped by record kind

use crate::{
    algorithm::Algorithm,
    detection::{Arrow, Block, Detection},
    landmarks::{Face, Hand, Pose},
};

/// Parameters of a result query
///
/// # Examples
///
/// ```
/// use huskylens_types::{Algorithm, ResultQuery};
///
/// let query = ResultQuery::new()
///     .algorithm(Algorithm::FaceRecognition)
///     .learned_only();
/// assert!(query.learned_only);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultQuery {
    /// Algorithm used to interpret the results (defaults to the active one)
    pub algorithm: Option<Algorithm>,

    /// Keep only records with exactly this ID
    pub id: Option<i16>,

    /// Keep only learned records (ignored when `id` is set)
    pub learned_only: bool,
}

impl ResultQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    pub fn id(mut self, id: i16) -> Self {
        self.id = Some(id);
        self
    }

    pub fn learned_only(mut self) -> Self {
        self.learned_only = true;
        self
    }

    /// Check a record against the filters.
    ///
    /// An explicit ID filter takes precedence over `learned_only`.
    pub fn matches(&self, detection: &Detection) -> bool {
        self.accepts_id(detection.id())
    }

    fn accepts_id(&self, id: i16) -> bool {
        match self.id {
            Some(wanted) => id == wanted,
            None => !self.learned_only || id > 0,
        }
    }
}

/// All records decoded from a single query, bucketed by kind.
///
/// Each bucket keeps the order in which the device sent the frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultSet {
    pub blocks: Vec<Block>,
    pub arrows: Vec<Arrow>,
    pub faces: Vec<Face>,
    pub hands: Vec<Hand>,
    pub poses: Vec<Pose>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the bucket of its kind
    pub fn push(&mut self, detection: Detection) {
        match detection {
            Detection::Block(block) => self.blocks.push(block),
            Detection::Arrow(arrow) => self.arrows.push(arrow),
            Detection::Face(face) => self.faces.push(face),
            Detection::Hand(hand) => self.hands.push(hand),
            Detection::Pose(pose) => self.poses.push(pose),
        }
    }

    /// Drop every record that does not match the query filters
    pub fn retain(&mut self, query: &ResultQuery) {
        self.blocks.retain(|block| query.accepts_id(block.id));
        self.arrows.retain(|arrow| query.accepts_id(arrow.id));
        self.faces.retain(|face| query.accepts_id(face.block.id));
        self.hands.retain(|hand| query.accepts_id(hand.block.id));
        self.poses.retain(|pose| query.accepts_id(pose.block.id));
    }

    /// Total number of records across all buckets
    pub fn len(&self) -> usize {
        self.blocks.len()
            + self.arrows.len()
            + self.faces.len()
            + self.hands.len()
            + self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<Detection> for ResultSet {
    fn extend<I: IntoIterator<Item = Detection>>(&mut self, iter: I) {
        for detection in iter {
            self.push(detection);
        }
    }
}

impl FromIterator<Detection> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Detection>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
