use crate::binder::{self, FieldBinding, FieldControl};
use crate::doc::{self, LoadedDoc};
use crate::statics;
use crate::value::DocValue;
use eframe::egui;
use std::path::PathBuf;

pub fn run_gui() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 720.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| {
            Ok(Box::new(FormApp {
                theme_dark: true,
                ..Default::default()
            }))
        }),
    )
}

/// The main application state: the loaded document (owned), the field
/// bindings for the current form, and transient UI state.
#[derive(Default)]
struct FormApp {
    doc: Option<LoadedDoc>,
    bindings: Vec<FieldBinding>,
    dialog_dir: Option<PathBuf>,
    status: String,
    errors: Vec<String>,
    theme_dark: bool,
}

impl FormApp {
    fn file_dialog(&self) -> rfd::FileDialog {
        let mut dlg = rfd::FileDialog::new().add_filter(statics::EN_FILE_FILTER, &["json"]);

        if let Some(dir) = self.dialog_dir.clone() {
            dlg = dlg.set_directory(dir);
        }

        dlg
    }

    fn open_file(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };

        // Clear any previously rendered form before loading.
        self.doc = None;
        self.bindings.clear();
        self.errors.clear();

        match LoadedDoc::load_path(&path) {
            Ok(doc) => {
                let (bindings, bind_errors) = binder::bind_object(&doc.fields);
                for e in &bind_errors {
                    tracing::warn!(path = %path.display(), "{e}");
                    self.errors.push(format!("Error: {e}"));
                }

                self.bindings = bindings;
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("Loaded {}", path.display());
                self.doc = Some(doc);
            }
            Err(e) => {
                self.status.clear();
                self.errors.push(format!("Error: {e:#}"));
            }
        }
    }

    fn save_file_as(&mut self) {
        let mut dlg = self.file_dialog();
        if let Some(doc) = self.doc.as_ref()
            && let Some(source_path) = doc.source_path.as_ref()
            && let Some(file_name) = source_path.file_name()
        {
            dlg = dlg.set_file_name(file_name.to_string_lossy());
        }

        let Some(path) = dlg.save_file() else {
            return;
        };

        let result = match self.doc.as_mut() {
            Some(doc) => doc.save_to_path(&path),
            // Nothing was ever loaded: write an empty object.
            None => doc::write_atomic(&path, statics::EMPTY_DOC_TEXT.as_bytes()),
        };

        match result {
            Ok(()) => {
                self.dialog_dir = path.parent().map(PathBuf::from);
                self.status = format!("Saved {}", path.display());
            }
            Err(e) => {
                self.errors.push(format!("Error: failed to save: {e:#}"));
            }
        }
    }

    fn render_form(&mut self, ui: &mut egui::Ui, doc: &mut LoadedDoc) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("json_form")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .striped(true)
                    .min_col_width(120.0)
                    .show(ui, |ui| {
                        for binding in &mut self.bindings {
                            ui.label(format!("{}:", binding.key));
                            let written = ui
                                .push_id(&binding.key, |ui| {
                                    render_value_control(ui, &mut binding.control)
                                })
                                .inner;
                            if let Some(value) = written {
                                doc.fields.insert(binding.key.clone(), value);
                                doc.mark_dirty();
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Render the control for one field and return the value to write back under
/// its key, if this frame's interaction produced one.
fn render_value_control(ui: &mut egui::Ui, control: &mut FieldControl) -> Option<DocValue> {
    match control {
        FieldControl::Null => {
            ui.label(statics::EN_LITERAL_NULL);
            None
        }
        FieldControl::Toggle { checked } => {
            if ui.checkbox(checked, statics::EN_EMPTY).changed() {
                Some(DocValue::Bool(*checked))
            } else {
                None
            }
        }
        FieldControl::Structured { rendered } => {
            // Height is capped so that large objects don't dominate the form.
            let mut preview = rendered.clone();
            egui::ScrollArea::vertical().max_height(96.0).show(ui, |ui| {
                ui.add_enabled(
                    false,
                    egui::TextEdit::multiline(&mut preview)
                        .font(egui::TextStyle::Monospace)
                        .desired_rows(4)
                        .desired_width(f32::INFINITY),
                );
            });
            None
        }
        FieldControl::Integer { .. } | FieldControl::Decimal { .. } | FieldControl::Text { .. } => {
            let mut text = control.text_buffer().unwrap_or(statics::EN_EMPTY).to_owned();
            let response = ui.add(
                egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY),
            );
            if response.changed() {
                control.accept_edit(&text)
            } else {
                None
            }
        }
    }
}

impl eframe::App for FormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_OPEN).clicked() {
                    self.open_file();
                }

                // Save is available even before a load; it writes "{\n}".
                if ui.button(statics::EN_BTN_SAVE_AS).clicked() {
                    self.save_file_as();
                }

                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.theme_dark = !self.theme_dark;
                    if self.theme_dark {
                        ctx.set_visuals(egui::Visuals::dark());
                    } else {
                        ctx.set_visuals(egui::Visuals::light());
                    }
                }

                if !self.status.is_empty() {
                    ui.separator();
                    ui.label(&self.status);
                }
            });
        });

        if !self.errors.is_empty() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        for err in &self.errors {
                            ui.colored_label(egui::Color32::RED, err);
                        }
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button(statics::EN_BTN_CLEAR).clicked() {
                            self.errors.clear();
                        }
                    });
                });
            });
        }

        if self.doc.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading(statics::EN_HOME_HEADING);
                ui.label(statics::EN_HOME_INSTRUCTIONS);
            });
            return;
        }

        let mut doc = self.doc.take().expect("checked above");
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_form(ui, &mut doc);
        });
        self.doc = Some(doc);
    }
}
