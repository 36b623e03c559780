//! Viewport panel: egui input → tour pointer events, tour → painter

mod painter;
pub use walkthrough_lib::viewport::{camera, orbit, picking};

use std::collections::BTreeMap;

use egui::{Event, MouseWheelUnit, PointerButton, Pos2, Rect, TouchPhase, Ui};
use glam::Vec2;
use walkthrough_lib::gesture::PointerEvent;
use walkthrough_lib::tour::Tour;

pub use painter::PainterRenderer;

use orbit::ArcBallOrbit;

pub type ViewerTour = Tour<PainterRenderer, ArcBallOrbit>;

/// Wheel units → DOM-style pixel delta
const LINE_HEIGHT: f32 = 40.0;
const PAGE_HEIGHT: f32 = 800.0;

/// Pointer and touch tracking for the central viewport
#[derive(Default)]
pub struct ViewportPanel {
    pressed: bool,
    touches: BTreeMap<u64, Pos2>,
    pinching: bool,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut Ui, tour: &mut ViewerTour) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        tour.renderer_mut().set_rect(rect);

        for event in self.collect_events(ui, rect, response.hovered()) {
            tour.handle_pointer(event);
        }

        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter_at(rect);
        tour.renderer().paint(&painter);
        draw_label(&painter, rect, tour.renderer().label());
    }

    /// Translate this frame's raw input into viewport-local pointer events
    fn collect_events(&mut self, ui: &Ui, rect: Rect, hovered: bool) -> Vec<PointerEvent> {
        let local = |pos: Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);
        let mut out = Vec::new();

        ui.input(|i| {
            let time_ms = i.time * 1000.0;
            for event in &i.events {
                match event {
                    Event::PointerButton {
                        pos,
                        button: PointerButton::Primary,
                        pressed: true,
                        ..
                    } if rect.contains(*pos) => {
                        self.pressed = true;
                        out.push(PointerEvent::Down {
                            pos: local(*pos),
                            time_ms,
                        });
                    }
                    Event::PointerButton {
                        pos,
                        button: PointerButton::Primary,
                        pressed: false,
                        ..
                    } if self.pressed => {
                        self.pressed = false;
                        out.push(PointerEvent::Up {
                            pos: local(*pos),
                            time_ms,
                        });
                    }
                    Event::PointerMoved(pos) if self.pressed => {
                        out.push(PointerEvent::Move { pos: local(*pos) });
                    }
                    Event::MouseWheel { unit, delta, .. } if hovered => {
                        let scale = match unit {
                            MouseWheelUnit::Point => 1.0,
                            MouseWheelUnit::Line => LINE_HEIGHT,
                            MouseWheelUnit::Page => PAGE_HEIGHT,
                        };
                        // egui scrolls up with positive y; the tour zooms out on positive
                        out.push(PointerEvent::Wheel {
                            delta: -delta.y * scale,
                        });
                    }
                    Event::Touch { id, phase, pos, .. } => {
                        match phase {
                            TouchPhase::Start | TouchPhase::Move => {
                                self.touches.insert(id.0, *pos);
                            }
                            TouchPhase::End | TouchPhase::Cancel => {
                                self.touches.remove(&id.0);
                            }
                        }
                        self.push_touch_state(&mut out, &local);
                    }
                    _ => {}
                }
            }
        });
        out
    }

    fn push_touch_state(&mut self, out: &mut Vec<PointerEvent>, local: &impl Fn(Pos2) -> Vec2) {
        let mut fingers = self.touches.values();
        match (fingers.next(), fingers.next()) {
            (Some(a), Some(b)) => {
                self.pinching = true;
                out.push(PointerEvent::TwoFinger {
                    a: local(*a),
                    b: local(*b),
                });
            }
            _ if self.pinching => {
                self.pinching = false;
                out.push(PointerEvent::TwoFingerEnd);
            }
            _ => {}
        }
    }
}

fn draw_label(painter: &egui::Painter, rect: Rect, label: Option<&str>) {
    let Some(label) = label else {
        return;
    };
    let galley = painter.layout_no_wrap(
        label.to_string(),
        egui::FontId::proportional(16.0),
        egui::Color32::WHITE,
    );
    let pos = rect.center_top() + egui::vec2(-galley.size().x / 2.0, 12.0);
    let bg = Rect::from_min_size(pos, galley.size()).expand2(egui::vec2(10.0, 5.0));
    painter.rect_filled(bg, 6.0, egui::Color32::from_black_alpha(150));
    painter.galley(pos, galley, egui::Color32::WHITE);
}
