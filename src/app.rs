use std::path::{Path, PathBuf};

use eframe::egui::{self, Key, KeyboardShortcut, Modifiers};

use crate::state::AppState;
use crate::ui::{charts, panels};

pub const APP_NAME: &str = "Segment Lens – Marketing Segmentation";

const FILTER_PANEL_WIDTH: f32 = 240.0;
const FILTER_PANEL_MIN_WIDTH: f32 = 180.0;

pub const OPEN_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::O);
pub const RELOAD_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::NONE, Key::F5);
pub const EXPORT_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::E);

/// Window title for the given data source.
pub fn window_title(source: Option<&Path>) -> String {
    match source.and_then(Path::file_name) {
        Some(name) => format!("{} – {APP_NAME}", name.to_string_lossy()),
        None => APP_NAME.to_string(),
    }
}

pub struct SegmentLensApp {
    pub state: AppState,
    /// Source the window title currently names; `None` until the first frame.
    titled: Option<Option<PathBuf>>,
}

impl SegmentLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state, titled: None }
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let source = self.state.dataset.as_ref().map(|ds| ds.source.clone());
        if self.titled.as_ref() == Some(&source) {
            return;
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(window_title(source.as_deref())));
        self.titled = Some(source);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (open, reload, export) = ctx.input_mut(|i| {
            (
                i.consume_shortcut(&OPEN_SHORTCUT),
                i.consume_shortcut(&RELOAD_SHORTCUT),
                i.consume_shortcut(&EXPORT_SHORTCUT),
            )
        });

        if open {
            panels::open_file_dialog(&mut self.state);
        }
        if reload && self.state.dataset.is_some() {
            self.state.reload();
        }
        if export && self.state.report.is_some() {
            panels::save_report_dialog(&mut self.state);
        }
    }
}

impl eframe::App for SegmentLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.sync_title(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        egui::SidePanel::left("filter_panel")
            .default_width(FILTER_PANEL_WIDTH)
            .min_width(FILTER_PANEL_MIN_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            charts::dashboard(ui, &self.state);
        });
    }
}
