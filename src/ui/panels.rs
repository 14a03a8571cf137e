use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use segment_lens::data::filter::Dimension;

use crate::app::{EXPORT_SHORTCUT, OPEN_SHORTCUT, RELOAD_SHORTCUT};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// A single user edit in one checkbox group.
enum GroupEdit<T> {
    SelectAll,
    SelectNone,
    Toggle(T),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🎯 Customer segmentation");
    ui.separator();

    // Clone the Arc so we can mutate state while reading options.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.label(format!("{} customers", dataset.len()));
    ui.label(format!("Ages as of {}", dataset.current_year));
    if dataset.gender_synthesized {
        ui.label(
            RichText::new(format!("Gender synthesized (seed {})", dataset.seed))
                .italics()
                .weak(),
        );
    }
    ui.separator();

    let options = &dataset.options;
    let palettes = state.palettes.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let edit = checkbox_group(
                ui,
                "👥 Marital status",
                &options.marital_statuses,
                &state.filters.marital_statuses,
                |v| Some(palettes.marital.color_for(v)),
            );
            match edit {
                Some(GroupEdit::SelectAll) => state.select_all(Dimension::MaritalStatus),
                Some(GroupEdit::SelectNone) => state.select_none(Dimension::MaritalStatus),
                Some(GroupEdit::Toggle(v)) => state.toggle_marital_status(&v),
                None => {}
            }

            let edit = checkbox_group(
                ui,
                "📊 Age bracket",
                &options.age_brackets,
                &state.filters.age_brackets,
                |v| Some(palettes.bracket.color_for(v)),
            );
            match edit {
                Some(GroupEdit::SelectAll) => state.select_all(Dimension::AgeBracket),
                Some(GroupEdit::SelectNone) => state.select_none(Dimension::AgeBracket),
                Some(GroupEdit::Toggle(v)) => state.toggle_age_bracket(&v),
                None => {}
            }

            let edit = checkbox_group(
                ui,
                "⚧ Gender",
                &options.genders,
                &state.filters.genders,
                |v| Some(palettes.gender.color_for(v)),
            );
            match edit {
                Some(GroupEdit::SelectAll) => state.select_all(Dimension::Gender),
                Some(GroupEdit::SelectNone) => state.select_none(Dimension::Gender),
                Some(GroupEdit::Toggle(v)) => state.toggle_gender(&v),
                None => {}
            }
        });
}

/// Collapsible list of checkboxes with All / None buttons. Returns the edit
/// the user made this frame, if any.
fn checkbox_group<T: Ord + Clone + Display>(
    ui: &mut Ui,
    title: &str,
    options: &BTreeSet<T>,
    selected: &BTreeSet<T>,
    color: impl Fn(&T) -> Option<Color32>,
) -> Option<GroupEdit<T>> {
    let mut edit = None;
    let header_text = format!("{title}  ({}/{})", selected.len(), options.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    edit = Some(GroupEdit::SelectAll);
                }
                if ui.small_button("None").clicked() {
                    edit = Some(GroupEdit::SelectNone);
                }
            });

            for val in options {
                let mut checked = selected.contains(val);
                let mut text = RichText::new(val.to_string());
                if let Some(c) = color(val) {
                    text = text.color(c);
                }
                if ui.checkbox(&mut checked, text).changed() {
                    edit = Some(GroupEdit::Toggle(val.clone()));
                }
            }
        });

    edit
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            let open = egui::Button::new("Open…").shortcut_text(ui.ctx().format_shortcut(&OPEN_SHORTCUT));
            if ui.add(open).clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let reload = egui::Button::new("Reload").shortcut_text(ui.ctx().format_shortcut(&RELOAD_SHORTCUT));
            if ui.add_enabled(state.dataset.is_some(), reload).clicked() {
                state.reload();
                ui.close_menu();
            }
            let export =
                egui::Button::new("Export report…").shortcut_text(ui.ctx().format_shortcut(&EXPORT_SHORTCUT));
            if ui.add_enabled(state.report.is_some(), export).clicked() {
                save_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(report)) = (&state.dataset, &state.report) {
            ui.label(format!(
                "{} customers loaded, {} in segment",
                ds.len(),
                report.metrics().count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open marketing campaign data")
        .add_filter("Semicolon-delimited", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn save_report_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export segment report")
        .set_file_name("segment_report.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_report(&path) {
            log::error!("Failed to export report: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
