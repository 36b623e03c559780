use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    Ru,
    En,
}

static CURRENT_LANG: AtomicU8 = AtomicU8::new(0); // 0=Ru (default)

pub fn lang() -> Lang {
    match CURRENT_LANG.load(Ordering::Relaxed) {
        1 => Lang::En,
        _ => Lang::Ru,
    }
}

pub fn set_lang(l: Lang) {
    CURRENT_LANG.store(
        match l {
            Lang::Ru => 0,
            Lang::En => 1,
        },
        Ordering::Relaxed,
    );
}

/// Translate a key to the current language.
pub fn t(key: &str) -> &'static str {
    let ru = lang() == Lang::Ru;
    match key {
        // ── Main menus ──────────────────────────────────────
        "menu.file" => if ru { "Файл" } else { "File" },
        "menu.open" => if ru { "Открыть тур..." } else { "Open tour..." },
        "menu.open_title" => if ru { "Открыть JSON тура" } else { "Open Tour JSON" },
        "menu.quit" => if ru { "Выход" } else { "Quit" },

        "menu.view" => if ru { "Вид" } else { "View" },
        "menu.overview" => if ru { "Общий вид  O" } else { "Overview  O" },
        "menu.viewpoints" => if ru { "Точки обзора" } else { "Viewpoints" },
        "menu.exit_panorama" => if ru { "Выйти из панорамы  Esc" } else { "Exit panorama  Esc" },
        "menu.language" => if ru { "Язык" } else { "Language" },

        // ── Toolbar ─────────────────────────────────────────
        "toolbar.overview" => if ru { "Общий вид" } else { "Overview" },
        "toolbar.exit" => if ru { "К макету" } else { "Back to dollhouse" },
        "toolbar.prev" => if ru { "Предыдущая панорама" } else { "Previous panorama" },
        "toolbar.next" => if ru { "Следующая панорама" } else { "Next panorama" },
        "toolbar.hint_dollhouse" => if ru {
            "Нажмите на точку, чтобы войти в панораму"
        } else {
            "Tap a hotspot to enter its panorama"
        },

        // ── Status bar ──────────────────────────────────────
        "status.no_tour" => if ru { "Тур не загружен" } else { "No tour loaded" },
        "status.nodes" => if ru { "Панорамы" } else { "Panoramas" },
        "status.dollhouse" => if ru { "Макет" } else { "Dollhouse" },
        "status.panorama" => if ru { "Панорама" } else { "Panorama" },
        "status.moving" => if ru { "перемещение..." } else { "moving..." },
        "status.model" => if ru { "Модель" } else { "Model" },
        "status.image" => if ru { "Изображение" } else { "Image" },
        "status.failed" => if ru { "не загружено" } else { "failed" },

        // ── Fallback ────────────────────────────────────────
        _ => "???",
    }
}
