//! egui painter backend for the walkthrough engine

use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, TextureHandle};
use glam::{Vec2, Vec3};

use super::camera::CameraState;
use super::picking::{Aabb, MarkerId, MarkerLayer, MarkerSet, MarkerSpec, PlacedMarker, Ray};
use walkthrough_lib::loading::LoadStatus;
use walkthrough_lib::renderer::{Renderer, VisualGroup};

/// Grid resolution of the panorama mesh
const PANO_COLS: usize = 48;
const PANO_ROWS: usize = 24;
/// Model points drawn at most; larger clouds are strided
const MAX_MODEL_POINTS: usize = 20_000;

const HOTSPOT_FILL: Color32 = Color32::from_rgb(60, 160, 255);
const FLOOR_FILL: Color32 = Color32::from_rgba_premultiplied(230, 230, 230, 210);
const MODEL_COLOR: Color32 = Color32::from_rgb(150, 150, 160);
const BOUNDS_COLOR: Color32 = Color32::from_rgb(90, 90, 100);

/// Renderer drawing through an egui [`Painter`]
pub struct PainterRenderer {
    camera: CameraState,
    rect: Rect,
    markers: MarkerSet,
    model: Vec<Vec3>,
    bounds: Option<Aabb>,
    dollhouse_visible: bool,
    panorama_visible: bool,
    panorama: Option<TextureHandle>,
    opacity: f32,
    label: Option<String>,
    status: LoadStatus,
}

impl PainterRenderer {
    pub fn new() -> Self {
        Self {
            camera: CameraState::default(),
            rect: Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0)),
            markers: MarkerSet::default(),
            model: Vec::new(),
            bounds: None,
            dollhouse_visible: true,
            panorama_visible: false,
            panorama: None,
            opacity: 1.0,
            label: None,
            status: LoadStatus::Idle,
        }
    }

    /// Screen area the viewport occupies this frame
    pub fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn paint(&self, painter: &Painter) {
        painter.rect_filled(self.rect, 0.0, Color32::from_rgb(24, 24, 28));

        if self.panorama_visible {
            if let Some(texture) = &self.panorama {
                painter.add(self.panorama_mesh(texture));
            }
            for (_, marker) in self.markers.iter() {
                if marker.spec.layer == MarkerLayer::Floor {
                    self.paint_floor_marker(painter, marker);
                }
            }
        }

        if self.dollhouse_visible {
            self.paint_model(painter);
            for (_, marker) in self.markers.iter() {
                if marker.spec.layer == MarkerLayer::Hotspot {
                    self.paint_hotspot(painter, marker);
                }
            }
        }
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.rect.width().max(1.0), self.rect.height().max(1.0))
    }

    fn to_screen(&self, point: Vec3) -> Option<Pos2> {
        let local = self.camera.project(point, self.size())?;
        Some(self.rect.min + egui::vec2(local.x, local.y))
    }

    /// Pixels per world unit at `point`'s depth
    fn scale_at(&self, point: Vec3) -> Option<f32> {
        let depth = (point - self.camera.position).dot(self.camera.forward());
        if depth <= self.camera.near {
            return None;
        }
        let focal = self.size().y / 2.0 / (self.camera.fov.to_radians() / 2.0).tan();
        Some(focal / depth)
    }

    /// Equirectangular image mapped through the camera: each grid vertex gets
    /// the texture coordinate of the direction its screen ray points at
    fn panorama_mesh(&self, texture: &TextureHandle) -> egui::Mesh {
        let size = self.size();
        let tint = Color32::WHITE.gamma_multiply(self.opacity.clamp(0.0, 1.0));
        let mut mesh = egui::Mesh::with_texture(texture.id());
        mesh.vertices.reserve((PANO_COLS + 1) * (PANO_ROWS + 1));
        mesh.indices.reserve(PANO_COLS * PANO_ROWS * 6);

        for row in 0..=PANO_ROWS {
            let v = row as f32 / PANO_ROWS as f32;
            let mut previous_u: Option<f32> = None;
            for col in 0..=PANO_COLS {
                let u = col as f32 / PANO_COLS as f32;
                let local = Vec2::new(u * size.x, v * size.y);
                let dir = self.camera.screen_ray(local, size).direction;

                let lon = dir.z.atan2(dir.x);
                let lat = dir.y.clamp(-1.0, 1.0).asin();
                let mut tex_u = lon / std::f32::consts::TAU;
                // Keep u continuous along the row; the texture repeats
                if let Some(prev) = previous_u {
                    tex_u += (prev - tex_u).round();
                }
                previous_u = Some(tex_u);
                let tex_v = 0.5 - lat / std::f32::consts::PI;

                mesh.vertices.push(egui::epaint::Vertex {
                    pos: self.rect.min + egui::vec2(local.x, local.y),
                    uv: egui::pos2(tex_u, tex_v),
                    color: tint,
                });
            }
        }

        for row in 0..PANO_ROWS {
            for col in 0..PANO_COLS {
                let i0 = (row * (PANO_COLS + 1) + col) as u32;
                let i1 = i0 + 1;
                let i2 = i0 + (PANO_COLS + 1) as u32;
                let i3 = i2 + 1;
                mesh.indices.extend_from_slice(&[i0, i2, i1, i1, i2, i3]);
            }
        }
        mesh
    }

    fn paint_model(&self, painter: &Painter) {
        if let Some(bounds) = &self.bounds {
            let (lo, hi) = (bounds.min, bounds.max);
            let corner = |i: usize| {
                Vec3::new(
                    if i & 1 == 0 { lo.x } else { hi.x },
                    if i & 2 == 0 { lo.y } else { hi.y },
                    if i & 4 == 0 { lo.z } else { hi.z },
                )
            };
            const EDGES: [(usize, usize); 12] = [
                (0, 1), (2, 3), (4, 5), (6, 7),
                (0, 2), (1, 3), (4, 6), (5, 7),
                (0, 4), (1, 5), (2, 6), (3, 7),
            ];
            for (a, b) in EDGES {
                if let (Some(pa), Some(pb)) = (self.to_screen(corner(a)), self.to_screen(corner(b))) {
                    painter.line_segment([pa, pb], Stroke::new(1.0, BOUNDS_COLOR));
                }
            }
        }

        let stride = (self.model.len() / MAX_MODEL_POINTS).max(1);
        for point in self.model.iter().step_by(stride) {
            if let Some(p) = self.to_screen(*point) {
                painter.rect_filled(Rect::from_center_size(p, egui::vec2(2.0, 2.0)), 0.0, MODEL_COLOR);
            }
        }
    }

    fn paint_hotspot(&self, painter: &Painter, marker: &PlacedMarker) {
        let position = marker.spec.position;
        let (Some(center), Some(scale)) = (self.to_screen(position), self.scale_at(position)) else {
            return;
        };
        let radius = (marker.spec.size * marker.scale * scale).max(3.0);
        painter.circle(center, radius, HOTSPOT_FILL, Stroke::new(2.0, Color32::WHITE));
    }

    fn paint_floor_marker(&self, painter: &Painter, marker: &PlacedMarker) {
        let spec = &marker.spec;
        let yaw = spec.facing.unwrap_or(0.0).to_radians();
        let forward = Vec3::new(yaw.cos(), 0.0, yaw.sin());
        let side = Vec3::new(-forward.z, 0.0, forward.x);
        let half = spec.size * marker.scale;

        let tip = spec.position + forward * half * 1.6;
        let left = spec.position - forward * half + side * half;
        let right = spec.position - forward * half - side * half;
        let points: Option<Vec<Pos2>> = [tip, left, right]
            .into_iter()
            .map(|p| self.to_screen(p))
            .collect();
        if let Some(points) = points {
            painter.add(Shape::convex_polygon(
                points,
                FLOOR_FILL,
                Stroke::new(1.5, Color32::from_black_alpha(120)),
            ));
        }
    }
}

impl Default for PainterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PainterRenderer {
    type Image = TextureHandle;
    type Model = Vec<Vec3>;

    fn camera(&self) -> CameraState {
        self.camera
    }

    fn set_camera(&mut self, camera: CameraState) {
        self.camera = camera;
    }

    fn viewport_size(&self) -> Vec2 {
        self.size()
    }

    fn attach_model(&mut self, model: Vec<Vec3>) -> Option<Aabb> {
        self.bounds = Aabb::from_points(&model);
        self.model = model;
        self.bounds
    }

    fn spawn_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        self.markers.spawn(marker)
    }

    fn despawn_marker(&mut self, id: MarkerId) {
        self.markers.despawn(id);
    }

    fn set_marker_scale(&mut self, id: MarkerId, scale: f32) {
        self.markers.set_scale(id, scale);
    }

    fn hit_test(&self, ray: &Ray, layer: MarkerLayer) -> Option<MarkerId> {
        self.markers.pick_nearest(ray, layer)
    }

    fn set_group_visible(&mut self, group: VisualGroup, visible: bool) {
        match group {
            VisualGroup::Dollhouse => self.dollhouse_visible = visible,
            VisualGroup::Panorama => self.panorama_visible = visible,
        }
    }

    fn show_panorama(&mut self, image: TextureHandle) {
        self.panorama = Some(image);
    }

    fn set_panorama_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    fn clear_panorama(&mut self) {
        self.panorama = None;
    }

    fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    fn set_status(&mut self, status: &LoadStatus) {
        self.status = status.clone();
    }
}
