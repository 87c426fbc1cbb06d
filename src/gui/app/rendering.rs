use super::types::KokoroApp;
use crate::config::{find_voice, Precision, VOICE_PRESETS};
use eframe::egui;

impl KokoroApp {
    pub(crate) fn render_main_layout(&mut self, ctx: &egui::Context) {
        let state = self.controller.state().clone();
        let busy = state.is_loading || state.is_generating;
        let mut generate = false;
        let mut retry = false;
        let non_english = self.text_looks_non_english();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Kokoro Desk");
            ui.add_space(6.0);

            if state.is_loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading model...");
                });
                ui.add_space(4.0);
            }

            let hint_color = if non_english {
                ui.visuals().warn_fg_color
            } else {
                ui.visuals().weak_text_color()
            };
            ui.label(egui::RichText::new("Please enter English text").color(hint_color));

            ui.add_enabled_ui(!busy, |ui| {
                ui.add(
                    egui::TextEdit::multiline(self.controller.text_mut())
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    ui.label("Voice:");
                    let selected = find_voice(&state.voice)
                        .map(|v| v.name)
                        .unwrap_or(state.voice.as_str());
                    egui::ComboBox::from_id_salt("voice_select")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for preset in VOICE_PRESETS {
                                ui.selectable_value(
                                    self.controller.voice_mut(),
                                    preset.id.to_string(),
                                    preset.name,
                                );
                            }
                        });

                    ui.label("Precision:");
                    egui::ComboBox::from_id_salt("precision_select")
                        .selected_text(self.precision_choice.as_str())
                        .show_ui(ui, |ui| {
                            for precision in Precision::ALL {
                                ui.selectable_value(
                                    &mut self.precision_choice,
                                    precision,
                                    precision.as_str(),
                                );
                            }
                        });
                });
                ui.add_space(6.0);

                let label = if state.is_generating {
                    "Generating..."
                } else {
                    "Generate"
                };
                if ui
                    .add_enabled(!state.text.trim().is_empty(), egui::Button::new(label))
                    .clicked()
                {
                    generate = true;
                }
            });

            if self.precision_choice != self.config.precision && !busy {
                ui.horizontal(|ui| {
                    ui.label(format!("Precision changes to {} on reload", self.precision_choice));
                    if ui.button("Reload model").clicked() {
                        retry = true;
                    }
                });
            }

            if let Some(err) = &state.last_error {
                ui.add_space(8.0);
                let error_color = ui.visuals().error_fg_color;
                ui.colored_label(error_color, err);
                if !state.model_ready && !state.is_loading && ui.button("Retry loading").clicked() {
                    retry = true;
                }
            }
        });

        if generate {
            self.generate();
        }
        if retry {
            self.retry_loading();
        }
    }
}
