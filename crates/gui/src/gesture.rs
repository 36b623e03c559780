//! Pointer/touch gesture disambiguation
//!
//! Raw input is reduced to taps, drags, pinches and wheel steps. Only one
//! pointer is tracked; a two-finger touch stream suspends single-pointer
//! dragging until it ends.

use glam::Vec2;

use crate::settings::GestureSettings;

/// Raw input event in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { pos: Vec2, time_ms: f64 },
    Move { pos: Vec2 },
    Up { pos: Vec2, time_ms: f64 },
    Wheel { delta: f32 },
    /// One frame of a two-finger touch
    TwoFinger { a: Vec2, b: Vec2 },
    TwoFingerEnd,
}

/// Classified gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap(Vec2),
    /// Frame-to-frame pointer delta while held
    Drag(Vec2),
    /// Change in finger distance since the previous two-finger frame
    Pinch(f32),
    Wheel(f32),
}

#[derive(Debug, Clone)]
struct Press {
    start_pos: Vec2,
    start_ms: f64,
    /// `None` right after a pinch so the next move does not jump
    last_pos: Option<Vec2>,
    pinched: bool,
}

#[derive(Debug, Clone)]
pub struct GestureDisambiguator {
    settings: GestureSettings,
    press: Option<Press>,
    pinch_distance: Option<f32>,
}

impl GestureDisambiguator {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            press: None,
            pinch_distance: None,
        }
    }

    /// Whether a press with this duration and displacement counts as a tap
    pub fn is_tap(&self, elapsed_ms: f64, displacement: f32) -> bool {
        elapsed_ms < self.settings.tap_max_ms && displacement < self.settings.tap_max_distance
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<Gesture> {
        match event {
            PointerEvent::Down { pos, time_ms } => {
                self.press = Some(Press {
                    start_pos: pos,
                    start_ms: time_ms,
                    last_pos: Some(pos),
                    pinched: self.pinch_distance.is_some(),
                });
                None
            }
            PointerEvent::Move { pos } => {
                if self.pinch_distance.is_some() {
                    return None;
                }
                let press = self.press.as_mut()?;
                let last = press.last_pos.replace(pos)?;
                let delta = pos - last;
                (delta != Vec2::ZERO).then_some(Gesture::Drag(delta))
            }
            PointerEvent::Up { pos, time_ms } => {
                let press = self.press.take()?;
                if press.pinched {
                    return None;
                }
                let elapsed = time_ms - press.start_ms;
                let displacement = pos.distance(press.start_pos);
                self.is_tap(elapsed, displacement).then_some(Gesture::Tap(pos))
            }
            PointerEvent::Wheel { delta } => Some(Gesture::Wheel(delta)),
            PointerEvent::TwoFinger { a, b } => {
                if let Some(press) = self.press.as_mut() {
                    press.pinched = true;
                    press.last_pos = None;
                }
                let distance = a.distance(b);
                match self.pinch_distance.replace(distance) {
                    None => None,
                    Some(previous) => Some(Gesture::Pinch(distance - previous)),
                }
            }
            PointerEvent::TwoFingerEnd => {
                self.pinch_distance = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_release(g: &mut GestureDisambiguator, elapsed: f64, distance: f32) -> Option<Gesture> {
        let start = Vec2::new(100.0, 100.0);
        g.handle(PointerEvent::Down {
            pos: start,
            time_ms: 1000.0,
        });
        g.handle(PointerEvent::Up {
            pos: start + Vec2::new(distance, 0.0),
            time_ms: 1000.0 + elapsed,
        })
    }

    #[test]
    fn test_tap_classification() {
        let mut g = GestureDisambiguator::new(GestureSettings::default());
        assert!(matches!(press_release(&mut g, 100.0, 3.0), Some(Gesture::Tap(_))));
        assert_eq!(press_release(&mut g, 500.0, 3.0), None);
        assert_eq!(press_release(&mut g, 100.0, 50.0), None);
    }

    #[test]
    fn test_drag_reports_frame_deltas() {
        let mut g = GestureDisambiguator::new(GestureSettings::default());
        assert_eq!(g.handle(PointerEvent::Move { pos: Vec2::ONE }), None);
        g.handle(PointerEvent::Down {
            pos: Vec2::ZERO,
            time_ms: 0.0,
        });
        assert_eq!(
            g.handle(PointerEvent::Move {
                pos: Vec2::new(5.0, 2.0)
            }),
            Some(Gesture::Drag(Vec2::new(5.0, 2.0)))
        );
        assert_eq!(
            g.handle(PointerEvent::Move {
                pos: Vec2::new(7.0, 2.0)
            }),
            Some(Gesture::Drag(Vec2::new(2.0, 0.0)))
        );
    }

    #[test]
    fn test_pinch_seeds_then_reports_delta_and_suspends_drag() {
        let mut g = GestureDisambiguator::new(GestureSettings::default());
        g.handle(PointerEvent::Down {
            pos: Vec2::ZERO,
            time_ms: 0.0,
        });
        assert_eq!(
            g.handle(PointerEvent::TwoFinger {
                a: Vec2::ZERO,
                b: Vec2::new(100.0, 0.0)
            }),
            None
        );
        assert_eq!(
            g.handle(PointerEvent::TwoFinger {
                a: Vec2::ZERO,
                b: Vec2::new(130.0, 0.0)
            }),
            Some(Gesture::Pinch(30.0))
        );
        assert_eq!(g.handle(PointerEvent::Move { pos: Vec2::ONE }), None);

        g.handle(PointerEvent::TwoFingerEnd);
        // First move after the pinch only re-seeds
        assert_eq!(g.handle(PointerEvent::Move { pos: Vec2::ONE }), None);
        assert!(matches!(
            g.handle(PointerEvent::Move {
                pos: Vec2::new(4.0, 1.0)
            }),
            Some(Gesture::Drag(_))
        ));
        // Lifting the finger that pinched never taps
        assert_eq!(
            g.handle(PointerEvent::Up {
                pos: Vec2::ZERO,
                time_ms: 50.0
            }),
            None
        );
    }

    #[test]
    fn test_up_without_down_is_ignored() {
        let mut g = GestureDisambiguator::new(GestureSettings::default());
        assert_eq!(
            g.handle(PointerEvent::Up {
                pos: Vec2::ZERO,
                time_ms: 10.0
            }),
            None
        );
    }
}
