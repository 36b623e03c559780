use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Индекс узла панорамы (число в конце имени файла)
pub type NodeIndex = u64;

/// Ключ для файлов без числа в имени — сортируется последним
pub const UNNUMBERED_INDEX: NodeIndex = NodeIndex::MAX;

/// Имя точки обзора, к которой подгоняется камера после загрузки модели
pub const OVERVIEW_VIEWPOINT: &str = "overview";

/// 3D-точка в пространстве модели
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Point3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Манифест панорам: `{ "files": [...], "count": N }`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Позиции хотспотов: индекс узла → точка
pub type HotspotMap = BTreeMap<NodeIndex, Point3>;

/// Таблица связей: индекс узла → соседние узлы (в порядке объявления)
pub type ConnectionTable = BTreeMap<NodeIndex, Vec<NodeIndex>>;

/// Именованная точка обзора для телепорта камеры
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Point3,
    pub target: Point3,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            position: Point3::new(8.0, 6.4, 8.0),
            target: Point3::default(),
        }
    }
}

/// Описание тура (JSON-файл развёртывания)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDescription {
    /// Отображаемое имя тура
    #[serde(default)]
    pub name: String,
    /// Путь к манифесту панорам
    pub manifest: String,
    /// Каталог с изображениями панорам
    #[serde(default)]
    pub panorama_dir: String,
    /// Файл позиций хотспотов (необязательный)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotspots: Option<String>,
    /// Модель для кукольного домика (необязательная)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Явная таблица связей
    #[serde(default)]
    pub connections: ConnectionTable,
    /// Добавлять обратные рёбра автоматически
    #[serde(default)]
    pub symmetric: bool,
    /// Смещение ориентации панорамы (градусы мирового рысканья)
    #[serde(default)]
    pub orientations: BTreeMap<NodeIndex, f32>,
    /// Именованные точки обзора
    #[serde(default)]
    pub viewpoints: BTreeMap<String, Viewpoint>,
}

/// Встроенные позиции хотспотов (последний уровень запасной цепочки)
pub fn default_hotspots() -> HotspotMap {
    [
        (1, Point3::new(-2.4, 0.2, -1.8)),
        (2, Point3::new(-0.6, 0.2, -1.8)),
        (3, Point3::new(1.4, 0.2, -1.6)),
        (4, Point3::new(1.6, 0.2, 0.9)),
        (5, Point3::new(-0.4, 0.2, 1.2)),
        (6, Point3::new(-2.2, 0.2, 1.0)),
    ]
    .into_iter()
    .collect()
}
