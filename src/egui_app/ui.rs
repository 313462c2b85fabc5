//! egui renderer for the application UI.

use std::time::Duration;

use eframe::egui::{self, Align2, Color32, Frame, RichText, Stroke, Ui};

use crate::config;
use crate::egui_app::controller::PredictionController;

/// Smallest viewport that still fits the form and result panel.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(720.0, 560.0);

const PANEL_FILL: Color32 = Color32::from_rgb(16, 16, 16);
const BAR_ACCENT: Color32 = Color32::from_rgb(122, 62, 129);
const BAR_TRACK: Color32 = Color32::from_rgb(30, 30, 30);
const ERROR_TINT: Color32 = Color32::from_rgb(192, 57, 43);
const CORRECT_TINT: Color32 = Color32::from_rgb(64, 140, 112);
const DIFFERENT_TINT: Color32 = Color32::from_rgb(192, 138, 43);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: PredictionController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app, loading persisted configuration and starting the
    /// fire-and-forget startup fetches.
    pub fn new() -> Result<Self, String> {
        let app_config = config::load_or_default()
            .and_then(config::AppConfig::normalized)
            .map_err(|err| format!("Failed to load config: {err}"))?;
        let mut controller = PredictionController::new(app_config);
        controller.start_background_tasks();
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = PANEL_FILL;
        visuals.widgets.noninteractive.bg_fill = PANEL_FILL;
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(Color32::from_rgb(24, 24, 24)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Wine Quality Prediction").color(Color32::WHITE));
                    ui.add_space(8.0);
                    ui.separator();
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(RichText::new("Close").color(Color32::WHITE))
                            .clicked()
                        {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                        if ui
                            .button(RichText::new("Model info").color(Color32::WHITE))
                            .clicked()
                        {
                            self.controller.request_model_info();
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(9.0, 11.0),
                        9.0,
                        status.badge_color,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_form(&mut self, ui: &mut Ui) {
        let mut edited = false;
        egui::Grid::new("feature_form")
            .num_columns(2)
            .spacing(egui::vec2(12.0, 6.0))
            .show(ui, |ui| {
                for field in &mut self.controller.ui.form.fields {
                    ui.label(RichText::new(&field.label).color(Color32::LIGHT_GRAY));
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut field.text)
                            .desired_width(140.0)
                            .hint_text("0.0"),
                    );
                    if response.changed() {
                        edited = true;
                    }
                    ui.end_row();
                }
            });
        if edited {
            self.controller.note_manual_edit();
        }
    }

    fn render_actions(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let predict = ui.add_enabled(
                !self.controller.ui.loading,
                egui::Button::new(RichText::new("Predict quality").color(Color32::WHITE)),
            );
            if predict.clicked() {
                self.controller.submit();
            }
            if ui.button("Reset").clicked() {
                self.controller.reset_form();
            }
            ui.separator();
            if ui.button("Random sample").clicked() {
                self.controller.generate_random_sample();
            }
            if ui.button("Load preset").clicked() {
                self.controller.open_preset_modal();
            }
            if ui.button("Show ranges").clicked() {
                self.controller.open_ranges_panel();
            }
        });
        if self.controller.ui.loading {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(RichText::new("Analyzing wine characteristics").color(Color32::GRAY));
            });
        }
    }

    fn render_indicator(&mut self, ui: &mut Ui) {
        if let Some(message) = self.controller.ui.indicator.message.clone() {
            ui.label(RichText::new(message).color(Color32::from_rgb(90, 176, 255)));
        }
    }

    fn render_error(&mut self, ui: &mut Ui) {
        let Some(message) = self.controller.ui.error.message.clone() else {
            return;
        };
        Frame::new()
            .fill(Color32::from_rgb(44, 20, 18))
            .stroke(Stroke::new(1.0, ERROR_TINT))
            .inner_margin(8)
            .corner_radius(6)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(&message).color(Color32::from_rgb(240, 180, 170)));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.controller.dismiss_error();
                        }
                    });
                });
            });
    }

    fn render_result(&mut self, ui: &mut Ui) {
        if !self.controller.ui.result.visible {
            return;
        }
        let result = self.controller.ui.result.clone();
        Frame::new()
            .fill(BAR_TRACK)
            .stroke(Stroke::new(1.0, Color32::from_rgb(48, 48, 48)))
            .inner_margin(10)
            .corner_radius(6)
            .show(ui, |ui| {
                ui.heading(RichText::new(&result.prediction).color(Color32::WHITE));
                ui.label(RichText::new(&result.confidence_label).color(Color32::LIGHT_GRAY));
                ui.add_space(8.0);
                for bar in &result.bars {
                    ui.horizontal(|ui| {
                        ui.add_sized(
                            egui::vec2(90.0, 18.0),
                            egui::Label::new(
                                RichText::new(&bar.label).color(Color32::LIGHT_GRAY),
                            ),
                        );
                        let desired = egui::vec2(ui.available_width() - 70.0, 18.0);
                        let (rect, _) = ui.allocate_exact_size(desired, egui::Sense::hover());
                        let painter = ui.painter();
                        painter.rect_filled(rect, 3, PANEL_FILL);
                        let mut fill = rect;
                        fill.set_width(rect.width() * bar.fraction);
                        painter.rect_filled(fill, 3, BAR_ACCENT);
                        ui.label(RichText::new(&bar.percent_label).color(Color32::WHITE));
                    });
                    ui.add_space(4.0);
                }
                if let Some(comparison) = &result.comparison {
                    let (tint, suffix) = if comparison.matches {
                        (CORRECT_TINT, " ✓")
                    } else {
                        (DIFFERENT_TINT, " (Different result)")
                    };
                    ui.add_space(6.0);
                    Frame::new()
                        .stroke(Stroke::new(1.0, tint))
                        .inner_margin(6)
                        .corner_radius(4)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(format!(
                                    "Expected: {} | Actual: {}{}",
                                    comparison.expected, comparison.actual, suffix
                                ))
                                .color(tint),
                            );
                        });
                }
            });
    }

    fn render_preset_modal(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.preset_modal.open {
            return;
        }
        let rows = self.controller.ui.preset_modal.rows.clone();
        let window = egui::Window::new("Preset samples")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("preset_scroll")
                    .max_height(320.0)
                    .show(ui, |ui| {
                        for row in &rows {
                            ui.push_id(row.id, |ui| {
                                let label = format!(
                                    "{}\n{}\nExpected: {}",
                                    row.name, row.description, row.expected_class
                                );
                                if ui
                                    .add_sized(
                                        egui::vec2(ui.available_width(), 56.0),
                                        egui::Button::new(
                                            RichText::new(label).color(Color32::WHITE),
                                        ),
                                    )
                                    .clicked()
                                {
                                    self.controller.load_preset(row.id);
                                }
                                ui.add_space(4.0);
                            });
                        }
                    });
                if ui.button("Cancel").clicked() {
                    self.controller.close_preset_modal();
                }
            });
        // Clicking anywhere outside the modal closes it.
        if let Some(window) = window {
            if window.response.clicked_elsewhere() {
                self.controller.close_preset_modal();
            }
        }
    }

    fn render_ranges_panel(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.ranges.open {
            return;
        }
        let rows = self.controller.ui.ranges.rows.clone();
        let mut open = true;
        egui::Window::new("Valid feature ranges")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("ranges_scroll")
                    .max_height(360.0)
                    .show(ui, |ui| {
                        egui::Grid::new("ranges_grid")
                            .num_columns(4)
                            .spacing(egui::vec2(16.0, 4.0))
                            .show(ui, |ui| {
                                ui.label(RichText::new("Feature").color(Color32::WHITE));
                                ui.label(RichText::new("Min").color(Color32::WHITE));
                                ui.label(RichText::new("Mean").color(Color32::WHITE));
                                ui.label(RichText::new("Max").color(Color32::WHITE));
                                ui.end_row();
                                for row in &rows {
                                    ui.label(
                                        RichText::new(&row.label).color(Color32::LIGHT_GRAY),
                                    );
                                    ui.label(&row.min);
                                    ui.label(&row.mean);
                                    ui.label(&row.max);
                                    ui.end_row();
                                }
                            });
                    });
            });
        if !open {
            self.controller.close_ranges_panel();
        }
    }

    fn render_model_info(&mut self, ctx: &egui::Context) {
        if !self.controller.ui.model_info.open {
            return;
        }
        let lines = self.controller.ui.model_info.lines.clone();
        let mut open = true;
        egui::Window::new("Model")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                for line in &lines {
                    ui.label(RichText::new(line).color(Color32::LIGHT_GRAY));
                }
            });
        if !open {
            self.controller.close_model_info();
        }
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();

        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("main_scroll")
                .show(ui, |ui| {
                    ui.add_space(8.0);
                    self.render_form(ui);
                    ui.add_space(10.0);
                    self.render_actions(ui);
                    ui.add_space(8.0);
                    self.render_indicator(ui);
                    self.render_error(ui);
                    ui.add_space(8.0);
                    self.render_result(ui);
                });
        });
        self.render_preset_modal(ctx);
        self.render_ranges_panel(ctx);
        self.render_model_info(ctx);

        if self.controller.background_work_active() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
