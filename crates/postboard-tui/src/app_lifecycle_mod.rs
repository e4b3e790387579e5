use std::time::{Duration, Instant};

use anyhow::Result;
use postboard_core::{
    FileSlot, KeyValueSlot, MemorySlot, MessagePersistence, MessageStore, log_debug,
};

use super::{App, Focus, Mode, UiConfig, UiTheme};
use crate::detail_mod::DetailViewer;
use crate::intake_mod::IntakeForm;
use crate::list_render_mod::ListRenderer;

const STATUS_TTL: Duration = Duration::from_secs(5);

/// Where the running board keeps its messages.
pub(crate) enum AppSlot {
    File(FileSlot),
    Memory(MemorySlot),
}

impl AppSlot {
    pub(crate) fn memory() -> Self {
        AppSlot::Memory(MemorySlot::new())
    }
}

impl KeyValueSlot for AppSlot {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            AppSlot::File(slot) => slot.get(key),
            AppSlot::Memory(slot) => slot.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match self {
            AppSlot::File(slot) => slot.set(key, value),
            AppSlot::Memory(slot) => slot.set(key, value),
        }
    }
}

impl App {
    pub(crate) fn new(
        store: MessageStore,
        persistence: MessagePersistence<AppSlot>,
        ui_config: &UiConfig,
        storage_label: String,
    ) -> Self {
        let mut list = ListRenderer::new(ui_config.preview_cols);
        list.rebuild(&store.all());
        let focus = if store.is_empty() {
            Focus::Form
        } else {
            Focus::List
        };
        Self {
            mode: Mode::Board,
            focus,
            store,
            persistence,
            list,
            detail: DetailViewer::new(),
            form: IntakeForm::new(),
            ui_theme: UiTheme::from_name(&ui_config.theme),
            form_width_pct: ui_config.form_width_pct,
            storage_label,
            status_message: None,
            status_set_at: None,
            show_help: false,
            last_tick: Instant::now(),
            last_list_area: None,
            last_form_area: None,
        }
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
        self.status_set_at = Some(Instant::now());
    }

    /// Surfaces a failed save without interrupting the session.
    pub(crate) fn report(&mut self, action: &str, result: Result<()>) {
        if let Err(err) = result {
            log_debug(&format!("{} failed: {}", action, err));
            self.set_status(format!("{} not saved: {}", action, err));
        }
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(at) = self.status_set_at {
            if at.elapsed() >= STATUS_TTL {
                self.status_message = None;
                self.status_set_at = None;
            }
        }
    }
}
