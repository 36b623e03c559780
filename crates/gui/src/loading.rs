//! Asset load bookkeeping
//!
//! Every request carries a ticket with a per-slot generation number. Issuing
//! a new request for a slot bumps its generation, so completions for older
//! requests are recognised as stale and dropped.

use shared::NodeIndex;

/// Which asset a load fills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadSlot {
    Model,
    Panorama,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub slot: LoadSlot,
    pub generation: u64,
    /// Node the panorama image belongs to
    pub node: Option<NodeIndex>,
}

/// Work item for the host's asset loader
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub ticket: LoadTicket,
    pub reference: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// Fraction in [0, 1]
    Determinate(f32),
    /// Total size unknown
    Indeterminate,
}

impl Progress {
    pub fn from_bytes(loaded: u64, total: Option<u64>) -> Self {
        match total {
            Some(total) if total > 0 => {
                Self::Determinate((loaded as f64 / total as f64).clamp(0.0, 1.0) as f32)
            }
            _ => Self::Indeterminate,
        }
    }
}

/// Visitor-facing loading state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading { slot: LoadSlot, progress: Progress },
    Failed { slot: LoadSlot, message: String },
}

#[derive(Debug, Default)]
pub struct LoadTracker {
    model_generation: u64,
    panorama_generation: u64,
    pending: Vec<LoadRequest>,
    model_status: LoadStatus,
    panorama_status: LoadStatus,
}

impl LoadTracker {
    fn generation_mut(&mut self, slot: LoadSlot) -> &mut u64 {
        match slot {
            LoadSlot::Model => &mut self.model_generation,
            LoadSlot::Panorama => &mut self.panorama_generation,
        }
    }

    fn status_mut(&mut self, slot: LoadSlot) -> &mut LoadStatus {
        match slot {
            LoadSlot::Model => &mut self.model_status,
            LoadSlot::Panorama => &mut self.panorama_status,
        }
    }

    /// Queue a request, superseding any earlier one for the same slot
    pub fn issue(&mut self, slot: LoadSlot, node: Option<NodeIndex>, reference: String) -> LoadTicket {
        let generation = self.generation_mut(slot);
        *generation += 1;
        let ticket = LoadTicket {
            slot,
            generation: *generation,
            node,
        };
        // A superseded request that was never handed out need not run
        self.pending.retain(|r| r.ticket.slot != slot);
        self.pending.push(LoadRequest { ticket, reference });
        *self.status_mut(slot) = LoadStatus::Loading {
            slot,
            progress: Progress::Indeterminate,
        };
        ticket
    }

    /// Make every outstanding ticket of `slot` stale
    pub fn invalidate(&mut self, slot: LoadSlot) {
        *self.generation_mut(slot) += 1;
        self.pending.retain(|r| r.ticket.slot != slot);
        *self.status_mut(slot) = LoadStatus::Idle;
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        let current = match ticket.slot {
            LoadSlot::Model => self.model_generation,
            LoadSlot::Panorama => self.panorama_generation,
        };
        ticket.generation == current
    }

    /// Hand queued requests to the host
    pub fn drain(&mut self) -> Vec<LoadRequest> {
        std::mem::take(&mut self.pending)
    }

    /// Status to show: the panorama while it is busy or failed, otherwise
    /// the model
    pub fn status(&self) -> &LoadStatus {
        match self.panorama_status {
            LoadStatus::Idle => &self.model_status,
            _ => &self.panorama_status,
        }
    }

    pub fn status_of(&self, slot: LoadSlot) -> &LoadStatus {
        match slot {
            LoadSlot::Model => &self.model_status,
            LoadSlot::Panorama => &self.panorama_status,
        }
    }

    /// Record progress; returns `false` for stale tickets
    pub fn progress(&mut self, ticket: &LoadTicket, loaded: u64, total: Option<u64>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        *self.status_mut(ticket.slot) = LoadStatus::Loading {
            slot: ticket.slot,
            progress: Progress::from_bytes(loaded, total),
        };
        true
    }

    /// Record completion; returns `false` for stale tickets
    pub fn finish(&mut self, ticket: &LoadTicket, error: Option<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        *self.status_mut(ticket.slot) = match error {
            Some(message) => LoadStatus::Failed {
                slot: ticket.slot,
                message,
            },
            None => LoadStatus::Idle,
        };
        true
    }
}

/// Opacity ramp for a newly shown panorama
#[derive(Debug, Clone)]
pub struct FadeRamp {
    opacity: f32,
    active: bool,
    step: f32,
    duration_ms: Option<f32>,
}

impl FadeRamp {
    /// `step` per tick, or over `duration_ms` of wall-clock time when set
    pub fn new(step: f32, duration_ms: Option<f32>) -> Self {
        Self {
            opacity: 1.0,
            active: false,
            step: step.max(f32::EPSILON),
            duration_ms,
        }
    }

    pub fn start(&mut self) {
        self.opacity = 0.0;
        self.active = true;
    }

    pub fn stop(&mut self) {
        self.opacity = 1.0;
        self.active = false;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance one tick; returns the new opacity while fading
    pub fn advance(&mut self, dt_ms: f32) -> Option<f32> {
        if !self.active {
            return None;
        }
        let increment = match self.duration_ms {
            Some(duration) if duration > 0.0 => dt_ms.max(0.0) / duration,
            _ => self.step,
        };
        self.opacity = (self.opacity + increment).min(1.0);
        if self.opacity >= 1.0 {
            self.active = false;
        }
        Some(self.opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_makes_old_ticket_stale() {
        let mut t = LoadTracker::default();
        let first = t.issue(LoadSlot::Panorama, Some(1), "a.jpg".into());
        let second = t.issue(LoadSlot::Panorama, Some(2), "b.jpg".into());
        assert!(!t.is_current(&first));
        assert!(t.is_current(&second));
        assert!(!t.finish(&first, None));
        // Only the latest request is still queued
        let queued = t.drain();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].ticket, second);
    }

    #[test]
    fn test_slots_are_independent() {
        let mut t = LoadTracker::default();
        let model = t.issue(LoadSlot::Model, None, "house.obj".into());
        t.issue(LoadSlot::Panorama, Some(1), "a.jpg".into());
        assert!(t.is_current(&model));
        t.invalidate(LoadSlot::Panorama);
        assert!(t.is_current(&model));
    }

    #[test]
    fn test_progress_and_failure_status() {
        let mut t = LoadTracker::default();
        let ticket = t.issue(LoadSlot::Panorama, Some(1), "a.jpg".into());
        t.progress(&ticket, 50, Some(200));
        assert_eq!(
            t.status(),
            &LoadStatus::Loading {
                slot: LoadSlot::Panorama,
                progress: Progress::Determinate(0.25)
            }
        );
        t.progress(&ticket, 50, None);
        assert!(matches!(
            t.status(),
            LoadStatus::Loading {
                progress: Progress::Indeterminate,
                ..
            }
        ));
        t.finish(&ticket, Some("404".into()));
        assert!(matches!(t.status(), LoadStatus::Failed { message, .. } if message == "404"));
    }

    #[test]
    fn test_model_status_survives_panorama_loads() {
        let mut t = LoadTracker::default();
        let model = t.issue(LoadSlot::Model, None, "house.obj".into());
        let pano = t.issue(LoadSlot::Panorama, Some(1), "a.jpg".into());
        t.finish(&pano, None);
        assert!(matches!(t.status(), LoadStatus::Loading { slot: LoadSlot::Model, .. }));

        t.finish(&model, Some("model 404".into()));
        t.issue(LoadSlot::Panorama, Some(2), "b.jpg".into());
        assert!(matches!(t.status(), LoadStatus::Loading { slot: LoadSlot::Panorama, .. }));
        t.invalidate(LoadSlot::Panorama);
        assert_eq!(t.status_of(LoadSlot::Panorama), &LoadStatus::Idle);
        assert!(matches!(t.status(), LoadStatus::Failed { slot: LoadSlot::Model, .. }));
    }

    #[test]
    fn test_fade_per_tick() {
        let mut fade = FadeRamp::new(0.25, None);
        fade.start();
        let steps: Vec<f32> = std::iter::from_fn(|| fade.advance(1000.0)).collect();
        assert_eq!(steps, vec![0.25, 0.5, 0.75, 1.0]);
        assert!(!fade.is_active());
    }

    #[test]
    fn test_fade_wall_clock() {
        let mut fade = FadeRamp::new(0.05, Some(400.0));
        fade.start();
        assert_eq!(fade.advance(100.0), Some(0.25));
        assert_eq!(fade.advance(1000.0), Some(1.0));
        assert_eq!(fade.advance(16.0), None);
    }
}
