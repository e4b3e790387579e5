use std::path::PathBuf;

use postboard_core::{DEFAULT_STORAGE_KEY, log_debug};

use super::{StorageConfig, UiConfig, normalize_ui_theme};

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("postboard.json"),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            form_width_pct: 40,
            preview_cols: 60,
            mouse: true,
        }
    }
}

fn parse_config(content: Option<&str>) -> Option<toml::Value> {
    let content = content?;
    match toml::from_str(content) {
        Ok(value) => Some(value),
        Err(err) => {
            log_debug(&format!("config warn parse failed, using defaults: {}", err));
            None
        }
    }
}

pub(crate) fn load_storage_config(content: Option<&str>) -> StorageConfig {
    let mut config = StorageConfig::default();
    let Some(value) = parse_config(content) else {
        return config;
    };
    let Some(storage) = value.get("storage") else {
        return config;
    };
    if let Some(path) = storage.get("path").and_then(|v| v.as_str()) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            config.path = PathBuf::from(trimmed);
        }
    }
    if let Some(key) = storage.get("key").and_then(|v| v.as_str()) {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            log_debug("config warn storage.key is empty, using default");
        } else {
            config.key = trimmed.to_string();
        }
    }
    config
}

pub(crate) fn load_ui_config(content: Option<&str>) -> UiConfig {
    let mut config = UiConfig::default();
    let Some(value) = parse_config(content) else {
        return config;
    };
    let Some(ui) = value.get("ui") else {
        return config;
    };
    if let Some(theme) = ui.get("theme").and_then(|v| v.as_str()) {
        config.theme = normalize_ui_theme(theme);
    }
    if let Some(pct) = ui.get("form_width_pct").and_then(|v| v.as_integer()) {
        config.form_width_pct = pct.clamp(20, 80) as u16;
    }
    if let Some(cols) = ui.get("preview_cols").and_then(|v| v.as_integer()) {
        config.preview_cols = cols.clamp(10, 400) as usize;
    }
    config.mouse = match ui.get("mouse") {
        Some(v) => v
            .as_bool()
            .or_else(|| {
                v.as_str()
                    .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            })
            .unwrap_or(true),
        None => true,
    };
    config
}
