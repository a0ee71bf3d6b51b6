//! Per-connection rewrite state.
//!
//! A context is owned by exactly one connection's processing task and is
//! dropped with the session. Nothing in it is shared or locked.

use tracing::debug;

use crate::entity::EntityKind;
use crate::position::{Baseline, Position, PositionCache};
use crate::tracker::EntityTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dimension {
    Nether,
    #[default]
    Overworld,
    End,
}

impl Dimension {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            -1 => Some(Dimension::Nether),
            0 => Some(Dimension::Overworld),
            1 => Some(Dimension::End),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Dimension::Nether => -1,
            Dimension::Overworld => 0,
            Dimension::End => 1,
        }
    }
}

/// How a position update was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Stored,
    /// A delta with no earlier absolute position.
    StoredWithoutBaseline,
    /// The entity is not tracked; nothing was stored.
    Untracked,
}

#[derive(Debug, Default)]
pub struct ConnectionContext {
    tracker: EntityTracker,
    positions: PositionCache,
    dimension: Dimension,
}

impl ConnectionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, id: i32, kind: EntityKind) {
        if let Some(previous) = self.tracker.track(id, kind) {
            // Id reuse without a despawn in between: the old position is stale.
            debug!("entity {id} re-tracked as {kind} (was {previous})");
            self.positions.forget(id);
        }
    }

    /// Remove `id` from the tracker and the position cache together.
    pub fn untrack(&mut self, id: i32) {
        self.tracker.untrack(id);
        self.positions.forget(id);
    }

    pub fn untrack_all(&mut self, ids: &[i32]) {
        for &id in ids {
            self.untrack(id);
        }
    }

    pub fn kind_of(&self, id: i32) -> Option<EntityKind> {
        self.tracker.kind_of(id)
    }

    pub fn position(&self, id: i32) -> Option<Position> {
        self.positions.get(id)
    }

    /// Store an absolute position for a tracked entity.
    pub fn cache_absolute(&mut self, id: i32, x: f64, y: f64, z: f64) -> CacheOutcome {
        if !self.tracker.is_tracked(id) {
            debug!("position for untracked entity {id} ignored");
            return CacheOutcome::Untracked;
        }
        self.positions.record_absolute(id, x, y, z);
        CacheOutcome::Stored
    }

    /// Fold a wire-format relative move into a tracked entity's position.
    pub fn cache_relative_move(&mut self, id: i32, dx: i16, dy: i16, dz: i16) -> CacheOutcome {
        if !self.tracker.is_tracked(id) {
            debug!("relative move for untracked entity {id} ignored");
            return CacheOutcome::Untracked;
        }
        match self.positions.record_relative_move(id, dx, dy, dz) {
            Baseline::Known => CacheOutcome::Stored,
            Baseline::Missing => CacheOutcome::StoredWithoutBaseline,
        }
    }

    pub fn position_anomalies(&self) -> u64 {
        self.positions.anomalies()
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn set_dimension(&mut self, dimension: Dimension) {
        self.dimension = dimension;
    }

    pub fn tracked_entities(&self) -> usize {
        self.tracker.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untrack_clears_kind_and_position() {
        let mut ctx = ConnectionContext::new();
        ctx.track(4, EntityKind::Sheep);
        ctx.cache_absolute(4, 1.0, 2.0, 3.0);
        ctx.untrack(4);
        assert_eq!(ctx.kind_of(4), None);
        assert_eq!(ctx.position(4), None);
    }

    #[test]
    fn untrack_all_clears_every_id() {
        let mut ctx = ConnectionContext::new();
        for id in 1..=3 {
            ctx.track(id, EntityKind::Item);
            ctx.cache_absolute(id, 0.0, 0.0, 0.0);
        }
        ctx.untrack_all(&[1, 3]);
        assert_eq!(ctx.kind_of(2), Some(EntityKind::Item));
        assert!(ctx.position(1).is_none() && ctx.position(3).is_none());
        assert_eq!(ctx.tracked_entities(), 1);
    }

    #[test]
    fn untracked_entities_are_not_cached() {
        let mut ctx = ConnectionContext::new();
        assert_eq!(ctx.cache_absolute(5, 1.0, 1.0, 1.0), CacheOutcome::Untracked);
        assert_eq!(ctx.cache_relative_move(5, 1, 1, 1), CacheOutcome::Untracked);
        assert_eq!(ctx.position(5), None);
        assert_eq!(ctx.position_anomalies(), 0);
    }

    #[test]
    fn relative_move_without_baseline_is_reported() {
        let mut ctx = ConnectionContext::new();
        ctx.track(6, EntityKind::Pig);
        assert_eq!(
            ctx.cache_relative_move(6, 4096, 0, 0),
            CacheOutcome::StoredWithoutBaseline
        );
        assert_eq!(ctx.position(6), Some(Position::new(1.0, 0.0, 0.0)));
        assert_eq!(ctx.position_anomalies(), 1);
    }

    #[test]
    fn retrack_drops_stale_position() {
        let mut ctx = ConnectionContext::new();
        ctx.track(8, EntityKind::Cow);
        ctx.cache_absolute(8, 5.0, 5.0, 5.0);
        ctx.track(8, EntityKind::Pig);
        assert_eq!(ctx.position(8), None);
    }

    #[test]
    fn dimension_ids() {
        assert_eq!(Dimension::from_id(-1), Some(Dimension::Nether));
        assert_eq!(Dimension::End.id(), 1);
        assert_eq!(Dimension::from_id(7), None);
        assert_eq!(ConnectionContext::new().dimension(), Dimension::Overworld);
    }
}
