//! Event types and sinks for observing generation runs.
//!
//! This module defines [`VillageEvent`] and a set of sinks to emit, collect, or forward
//! events while [`crate::village::runner::VillageGenerator`] executes the pipeline.
//! Soft failures (a dropped building type, a wall without qualifying road exits) are
//! reported here rather than as errors.
use glam::Vec2;

use crate::village::catalog::BuildingType;
use crate::village::GenerationStats;

/// Describes events emitted during generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum VillageEvent {
    /// Emitted once the building target is known, before any stage runs.
    RunStarted {
        seed: u64,
        /// Building count the run asks for, anchor included.
        requested_buildings: usize,
    },

    /// Emitted once the road network exists.
    RoadsBuilt {
        main: usize,
        side: usize,
        path: usize,
    },

    /// Emitted for every accepted footprint.
    BuildingPlaced {
        id: String,
        building_type: BuildingType,
        /// 1-based attempt that succeeded.
        attempts: usize,
    },

    /// A building type failed every attempt and was dropped.
    PlacementExhausted {
        building_type: BuildingType,
        attempts: usize,
    },

    /// Emitted after the wall stage, also when no wall was built.
    WallFitted {
        built: bool,
        gates: usize,
    },

    /// No road exit qualified; a single fallback gate was placed at `position`.
    GateFallback {
        position: Vec2,
    },

    /// Emitted after the rural stage.
    RuralExtended {
        roads: usize,
        buildings: usize,
    },

    /// Emitted with the final counters.
    RunFinished {
        stats: GenerationStats,
    },
}

/// Discriminant of [`VillageEvent`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VillageEventKind {
    RunStarted,
    RoadsBuilt,
    BuildingPlaced,
    PlacementExhausted,
    WallFitted,
    GateFallback,
    RuralExtended,
    RunFinished,
}

impl VillageEvent {
    pub fn kind(&self) -> VillageEventKind {
        match self {
            VillageEvent::RunStarted { .. } => VillageEventKind::RunStarted,
            VillageEvent::RoadsBuilt { .. } => VillageEventKind::RoadsBuilt,
            VillageEvent::BuildingPlaced { .. } => VillageEventKind::BuildingPlaced,
            VillageEvent::PlacementExhausted { .. } => VillageEventKind::PlacementExhausted,
            VillageEvent::WallFitted { .. } => VillageEventKind::WallFitted,
            VillageEvent::GateFallback { .. } => VillageEventKind::GateFallback,
            VillageEvent::RuralExtended { .. } => VillageEventKind::RuralExtended,
            VillageEvent::RunFinished { .. } => VillageEventKind::RunFinished,
        }
    }
}

/// A generic event sink that accepts [`VillageEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: VillageEvent);

    /// Lets a sink skip construction of events it ignores.
    #[inline]
    fn wants(&self, _kind: VillageEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = VillageEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: VillageEvent) {}

    #[inline]
    fn wants(&self, _kind: VillageEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(VillageEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(VillageEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(VillageEvent),
{
    #[inline]
    fn send(&mut self, event: VillageEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<VillageEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<VillageEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[VillageEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events of one kind, in emission order.
    pub fn of_kind(&self, kind: VillageEventKind) -> impl Iterator<Item = &VillageEvent> + '_ {
        self.events.iter().filter(move |e| e.kind() == kind)
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: VillageEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: VillageEvent) {
        if self.sinks.is_empty() {
            return;
        }
        let last_idx = self.sinks.len() - 1;
        for i in 0..last_idx {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: VillageEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
