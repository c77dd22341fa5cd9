//! RNG module - random piece selection and the spawn queue
//!
//! Piece selection is an independent uniform draw per spawn: there is no bag, so
//! repeats and long droughts of a shape are possible. The random source sits behind
//! [`RandomSource`] so tests and replays can script the sequence.
//!
//! Also provides a simple LCG for deterministic seeding.

use crate::pieces::Piece;
use crate::types::PieceKind;

/// Source of piece indices
pub trait RandomSource {
    /// Return a value in `[0, bound)`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        ((u64::from(self.next_u32()) * u64::from(max)) >> 32) as u32
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RandomSource for SimpleRng {
    fn next_index(&mut self, bound: usize) -> usize {
        self.next_range(bound as u32) as usize
    }
}

/// Scripted source: yields piece kinds from a fixed list, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    kinds: Vec<PieceKind>,
    pos: usize,
}

impl SequenceSource {
    /// Panics if `kinds` is empty.
    pub fn new(kinds: impl Into<Vec<PieceKind>>) -> Self {
        let kinds = kinds.into();
        assert!(!kinds.is_empty(), "sequence source needs at least one kind");
        Self { kinds, pos: 0 }
    }

    /// Always the same kind
    pub fn repeat(kind: PieceKind) -> Self {
        Self::new(vec![kind])
    }
}

impl RandomSource for SequenceSource {
    fn next_index(&mut self, bound: usize) -> usize {
        let kind = self.kinds[self.pos % self.kinds.len()];
        self.pos += 1;
        PieceKind::ALL
            .iter()
            .position(|&k| k == kind)
            .unwrap_or(0)
            % bound
    }
}

/// Uniformly pick one of the seven kinds
pub fn random_kind(rng: &mut impl RandomSource) -> PieceKind {
    PieceKind::ALL[rng.next_index(PieceKind::ALL.len())]
}

/// Spawn queue: owns the pre-generated "next" piece
#[derive(Debug, Clone)]
pub struct PieceQueue<R: RandomSource = SimpleRng> {
    next: Option<Piece>,
    rng: R,
}

impl PieceQueue<SimpleRng> {
    /// Create a queue backed by a seeded LCG
    pub fn new(seed: u32) -> Self {
        Self::with_source(SimpleRng::new(seed))
    }
}

impl<R: RandomSource> PieceQueue<R> {
    /// The first `next` piece is generated lazily on the first [`PieceQueue::advance`].
    pub fn with_source(rng: R) -> Self {
        Self { next: None, rng }
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    /// Promote `next` (generating it first if absent) and draw a fresh `next`.
    ///
    /// The returned piece sits at the spawn position.
    pub fn advance(&mut self) -> Piece {
        let mut current = match self.next.take() {
            Some(piece) => piece,
            None => self.generate(),
        };
        current.move_to_spawn();
        self.next = Some(self.generate());
        current
    }

    fn generate(&mut self) -> Piece {
        Piece::spawn(random_kind(&mut self.rng))
    }
}

impl Default for PieceQueue<SimpleRng> {
    fn default() -> Self {
        Self::new(1)
    }
}
