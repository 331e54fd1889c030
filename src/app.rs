//! Main application UI.
//! Renders the trainer's projections and forwards user commands to it.

use eframe::egui;
use log::warn;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use vocab_trainer::exchange::files;
use vocab_trainer::models::{Direction, SortColumn, SortOrder, StatsFilter};
use vocab_trainer::trainer::Question;
use vocab_trainer::{
    Confirmation, Gender, RestoreReport, SessionKind, Settings, SqliteStore,
    Trainer, TrainerError,
};

const GENDERS: [Gender; 4] = [
    Gender::None,
    Gender::Masculine,
    Gender::Feminine,
    Gender::Neutral,
];

const CORRECT_FILL: egui::Color32 = egui::Color32::from_rgb(46, 125, 50);
const WRONG_FILL: egui::Color32 = egui::Color32::from_rgb(198, 40, 40);

/// Application screen states
#[derive(Default, Clone, Copy, PartialEq, Eq)]
enum Screen {
    #[default]
    Dashboard,
    Practice,
    Statistics,
    Import,
    Settings,
}

/// Destructive commands that go through a confirmation dialog.
#[derive(Clone, Debug)]
enum Destructive {
    DeleteList(String),
    DeleteCard(String),
    WipeList,
    DeleteCurrent,
    ImportCsv(String),
    ImportLegacy { cards: String, lists: Option<String> },
}

struct PendingConfirm {
    prompt: String,
    action: Destructive,
}

#[derive(Default)]
struct CardForm {
    word: String,
    meaning: String,
    gender: Gender,
    note: String,
    image: String,
}

fn gender_text(gender: Gender) -> &'static str {
    match gender {
        Gender::None => "None",
        other => other.label(),
    }
}

fn gender_combo(ui: &mut egui::Ui, id: &str, gender: &mut Gender) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(gender_text(*gender))
        .show_ui(ui, |ui| {
            for g in GENDERS {
                ui.selectable_value(gender, g, gender_text(g));
            }
        });
}

fn gender_color(gender: Gender) -> Option<egui::Color32> {
    match gender {
        Gender::Masculine => Some(egui::Color32::from_rgb(66, 133, 244)),
        Gender::Feminine => Some(egui::Color32::from_rgb(219, 68, 122)),
        Gender::Neutral => Some(egui::Color32::from_rgb(67, 160, 71)),
        Gender::None => None,
    }
}

fn restore_message(report: &RestoreReport) -> String {
    let mut message = format!(
        "Imported {} lists and {} cards.",
        report.lists, report.cards
    );
    if !report.warnings.is_empty() {
        message.push_str(&format!("\n{} rows skipped:", report.warnings.len()));
        for warning in report.warnings.iter().take(10) {
            message.push_str(&format!("\n  {}", warning));
        }
    }
    message
}

/// Main application state
pub struct TrainerApp {
    trainer: Trainer<SqliteStore>,
    screen: Screen,

    new_list_name: String,
    card_form: CardForm,
    bulk_text: String,

    stats_filter: StatsFilter,
    stats_sort: Option<(SortColumn, SortOrder)>,

    answered_at: Option<Instant>,
    note_draft: String,
    note_card: Option<String>,
    edit_form: Option<CardForm>,

    settings_draft: Settings,
    confirm: Option<PendingConfirm>,
    message: Option<String>,
}

impl eframe::App for TrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(if self.trainer.settings().night_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        });

        self.tick_auto_advance(ctx);

        egui::TopBottomPanel::top("navigation").show(ctx, |ui| self.render_navigation(ui));
        egui::SidePanel::left("lists")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| self.render_lists(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.screen {
                Screen::Dashboard => self.render_dashboard(ui),
                Screen::Practice => self.render_practice(ui),
                Screen::Statistics => self.render_statistics(ui),
                Screen::Import => self.render_import(ui),
                Screen::Settings => self.render_settings(ui),
            });
        });

        self.render_dialogs(ctx);
    }
}

impl TrainerApp {
    pub fn new(trainer: Trainer<SqliteStore>) -> Self {
        let settings_draft = trainer.settings().clone();
        Self {
            trainer,
            screen: Screen::Dashboard,
            new_list_name: String::new(),
            card_form: CardForm::default(),
            bulk_text: String::new(),
            stats_filter: StatsFilter::default(),
            stats_sort: None,
            answered_at: None,
            note_draft: String::new(),
            note_card: None,
            edit_form: None,
            settings_draft,
            confirm: None,
            message: None,
        }
    }

    fn report(&mut self, error: TrainerError) {
        match &error {
            TrainerError::EmptyPool(_) | TrainerError::Validation(_) => {}
            other => warn!("{}", other),
        }
        self.message = Some(error.to_string());
    }

    /// Runs a destructive command. Unconfirmed calls come back with a prompt to show.
    fn run_destructive(&mut self, action: Destructive, confirmation: Confirmation) {
        let result = match &action {
            Destructive::DeleteList(id) => self.trainer.delete_list(id, confirmation).map(|()| None),
            Destructive::DeleteCard(id) => self.trainer.delete_card(id, confirmation).map(|()| None),
            Destructive::WipeList => self.trainer.wipe_list(confirmation).map(|()| None),
            Destructive::DeleteCurrent => self.trainer.delete_current(confirmation).map(|_| None),
            Destructive::ImportCsv(content) => self
                .trainer
                .import_csv(content, confirmation)
                .map(|report| Some(restore_message(&report))),
            Destructive::ImportLegacy { cards, lists } => self
                .trainer
                .import_legacy_json(cards, lists.as_deref(), confirmation)
                .map(|report| Some(restore_message(&report))),
        };

        match result {
            Ok(message) => {
                self.answered_at = None;
                self.edit_form = None;
                if message.is_some() {
                    self.settings_draft = self.trainer.settings().clone();
                    self.message = message;
                }
            }
            Err(TrainerError::ConfirmationRequired(prompt)) => {
                self.confirm = Some(PendingConfirm { prompt, action });
            }
            Err(e) => self.report(e),
        }
    }

    fn tick_auto_advance(&mut self, ctx: &egui::Context) {
        let Some(answered_at) = self.answered_at else {
            return;
        };
        if self.confirm.is_some() {
            return;
        }
        let delay = Duration::from_millis(self.trainer.settings().answer_delay_ms);
        let elapsed = answered_at.elapsed();
        if elapsed < delay {
            ctx.request_repaint_after(delay - elapsed);
            return;
        }

        self.answered_at = None;
        self.edit_form = None;
        if let Err(e) = self.trainer.advance() {
            self.report(e);
        }
    }

    fn render_navigation(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (screen, label) in [
                (Screen::Dashboard, "Dashboard"),
                (Screen::Statistics, "Statistics"),
                (Screen::Import, "Import / Export"),
                (Screen::Settings, "Settings"),
            ] {
                if ui.selectable_label(self.screen == screen, label).clicked() {
                    self.trainer.end_session();
                    self.answered_at = None;
                    self.screen = screen;
                }
            }
        });
    }

    fn render_lists(&mut self, ui: &mut egui::Ui) {
        ui.heading("Lists");
        ui.separator();

        // Deferred so the list borrow ends before the trainer is mutated
        let mut action_select: Option<String> = None;
        let current_id = self.trainer.current_list_id().to_string();
        for list in self.trainer.lists() {
            if ui.selectable_label(list.id == current_id, &list.name).clicked() {
                action_select = Some(list.id.clone());
            }
        }
        if let Some(id) = action_select {
            if id != current_id {
                self.answered_at = None;
                if let Err(e) = self.trainer.select_list(&id) {
                    self.report(e);
                }
                if self.screen == Screen::Practice {
                    self.screen = Screen::Dashboard;
                }
            }
        }

        ui.separator();
        ui.label("New list:");
        ui.text_edit_singleline(&mut self.new_list_name);
        if ui.button("Create List").clicked() {
            match self.trainer.create_list(&self.new_list_name) {
                Ok(()) => {
                    self.new_list_name.clear();
                    self.screen = Screen::Dashboard;
                }
                Err(e) => self.report(e),
            }
        }

        ui.add_space(20.0);
        if ui.button("Delete Current List").clicked() {
            self.run_destructive(Destructive::DeleteList(current_id), Confirmation::Unconfirmed);
        }
    }

    fn render_dashboard(&mut self, ui: &mut egui::Ui) {
        let list_name = self
            .trainer
            .current_list()
            .map(|l| l.name.clone())
            .unwrap_or_default();
        ui.heading(&list_name);

        let dashboard = self.trainer.dashboard();
        egui::Grid::new("dashboard_counts").show(ui, |ui| {
            ui.label("Total cards:");
            ui.label(dashboard.total.to_string());
            ui.end_row();
            ui.label("Never practiced:");
            ui.label(dashboard.never_practiced.to_string());
            ui.end_row();
            ui.label("Ready to practice:");
            ui.label(dashboard.ready_to_practice.to_string());
            ui.end_row();
            ui.label("Known words:");
            ui.label(dashboard.known.to_string());
            ui.end_row();
        });

        ui.add_space(10.0);
        let mut action_start: Option<SessionKind> = None;
        ui.horizontal(|ui| {
            if ui
                .add_enabled(dashboard.can_learn(), egui::Button::new("Learn New Words"))
                .clicked()
            {
                action_start = Some(SessionKind::Learn);
            }
            if ui
                .add_enabled(dashboard.can_practice(), egui::Button::new("Practice"))
                .clicked()
            {
                action_start = Some(SessionKind::Practice);
            }
        });
        if let Some(kind) = action_start {
            self.start_session(kind);
        }

        ui.separator();
        self.render_card_form(ui);
        ui.separator();
        self.render_card_list(ui);
    }

    fn start_session(&mut self, kind: SessionKind) {
        self.answered_at = None;
        self.edit_form = None;
        match self.trainer.start_session(kind) {
            Ok(()) => self.screen = Screen::Practice,
            Err(e) => self.report(e),
        }
    }

    fn render_card_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Add Card");
        egui::Grid::new("add_card_form").num_columns(2).show(ui, |ui| {
            ui.label("Word:");
            ui.text_edit_singleline(&mut self.card_form.word);
            ui.end_row();
            ui.label("Meaning:");
            ui.text_edit_singleline(&mut self.card_form.meaning);
            ui.end_row();
            ui.label("Gender:");
            gender_combo(ui, "add_card_gender", &mut self.card_form.gender);
            ui.end_row();
            ui.label("Note:");
            ui.text_edit_singleline(&mut self.card_form.note);
            ui.end_row();
            ui.label("Image URL:");
            ui.text_edit_singleline(&mut self.card_form.image);
            ui.end_row();
        });

        if ui.button("Add Card").clicked() {
            let form = &self.card_form;
            match self
                .trainer
                .add_card(&form.word, &form.meaning, form.gender, &form.note, &form.image)
            {
                Ok(_) => self.card_form = CardForm::default(),
                Err(e) => self.report(e),
            }
        }
    }

    fn render_card_list(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading(format!("Cards ({})", self.trainer.cards().len()));
            if ui.button("Delete All Cards").clicked() {
                self.run_destructive(Destructive::WipeList, Confirmation::Unconfirmed);
            }
        });

        let mut action_toggle: Option<String> = None;
        let mut action_delete: Option<String> = None;
        egui::Grid::new("card_list").striped(true).show(ui, |ui| {
            for card in self.trainer.cards() {
                ui.label(&card.word);
                ui.label(&card.meaning);
                ui.label(card.gender.label());
                let mut known = card.known;
                if ui.checkbox(&mut known, "Known").changed() {
                    action_toggle = Some(card.id.clone());
                }
                if ui.small_button("Delete").clicked() {
                    action_delete = Some(card.id.clone());
                }
                ui.end_row();
            }
        });

        if let Some(id) = action_toggle {
            if let Err(e) = self.trainer.toggle_known(&id) {
                self.report(e);
            }
        }
        if let Some(id) = action_delete {
            self.run_destructive(Destructive::DeleteCard(id), Confirmation::Unconfirmed);
        }
    }

    fn render_practice(&mut self, ui: &mut egui::Ui) {
        let Some(question) = self.trainer.question() else {
            self.render_summary(ui);
            return;
        };

        if self.note_card.as_deref() != Some(question.card_id.as_str()) {
            self.note_draft = question.note.clone();
            self.note_card = Some(question.card_id.clone());
            self.edit_form = None;
        }

        let title = match question.kind {
            SessionKind::Learn => "Learning",
            SessionKind::Practice => "Practice",
        };
        ui.heading(title);
        ui.label(&question.progress);
        ui.add_space(10.0);

        ui.group(|ui| {
            ui.set_min_height(150.0);
            ui.vertical_centered(|ui| {
                let mut prompt = egui::RichText::new(&question.prompt).size(32.0).strong();
                if let Some(color) = gender_color(question.gender) {
                    prompt = prompt.color(color);
                }
                ui.label(prompt);
                if question.gender != Gender::None {
                    ui.label(question.gender.label());
                }
                if let Some(hint) = &question.hint {
                    ui.label(hint);
                }
                if !question.note.is_empty() {
                    ui.label(egui::RichText::new(&question.note).italics());
                }
                if question.has_audio() {
                    ui.label("Audio attached");
                }
            });
        });

        ui.add_space(10.0);
        let action_answer = self.render_options(ui, &question);
        if let Some(feedback) = &question.feedback {
            ui.label(egui::RichText::new(feedback.message()).strong());
        }
        if let Some(selected) = action_answer {
            match self.trainer.submit_answer(&selected) {
                Ok(_) => self.answered_at = Some(Instant::now()),
                Err(e) => self.report(e),
            }
        }

        ui.separator();
        self.render_card_tools(ui);
    }

    /// Returns the value of a clicked option.
    fn render_options(&self, ui: &mut egui::Ui, question: &Question) -> Option<String> {
        let mut clicked = None;
        let answered = question.feedback.as_ref();
        for option in &question.options {
            let mut button = egui::Button::new(option.value.as_str()).min_size(egui::vec2(300.0, 32.0));
            if let Some(feedback) = answered {
                if option.value == feedback.correct_answer {
                    button = button.fill(CORRECT_FILL);
                } else if option.value == feedback.selected {
                    button = button.fill(WRONG_FILL);
                }
            }
            let response = ui.add_enabled(answered.is_none(), button);
            let response = if option.image.is_empty() {
                response
            } else {
                response.on_hover_text(&option.image)
            };
            if response.clicked() {
                clicked = Some(option.value.clone());
            }
        }
        clicked
    }

    fn render_card_tools(&mut self, ui: &mut egui::Ui) {
        let mut action_known = false;
        let mut action_delete = false;
        let mut action_edit = false;
        let mut action_audio = false;
        let mut action_back = false;

        ui.horizontal(|ui| {
            action_known = ui.button("Mark as Known").clicked();
            action_edit = ui.button("Edit").clicked();
            action_delete = ui.button("Delete Card").clicked();
            action_audio = ui.button("Attach Audio...").clicked();
            action_back = ui.button("Back to Dashboard").clicked();
        });

        ui.horizontal(|ui| {
            ui.label("Note:");
            ui.text_edit_singleline(&mut self.note_draft);
            if ui.button("Save Note").clicked() {
                if let Err(e) = self.trainer.set_note(&self.note_draft) {
                    self.report(e);
                }
            }
        });

        let mut action_save_edit = false;
        if let Some(form) = &mut self.edit_form {
            egui::Grid::new("edit_card_form").num_columns(2).show(ui, |ui| {
                ui.label("Word:");
                ui.text_edit_singleline(&mut form.word);
                ui.end_row();
                ui.label("Meaning:");
                ui.text_edit_singleline(&mut form.meaning);
                ui.end_row();
                ui.label("Gender:");
                gender_combo(ui, "edit_card_gender", &mut form.gender);
                ui.end_row();
            });
            action_save_edit = ui.button("Save Changes").clicked();
        }

        if action_edit {
            self.open_edit_form();
        }
        if action_save_edit {
            self.save_edit_form();
        }
        if action_known {
            self.answered_at = None;
            if let Err(e) = self.trainer.mark_known() {
                self.report(e);
            }
        }
        if action_delete {
            self.run_destructive(Destructive::DeleteCurrent, Confirmation::Unconfirmed);
        }
        if action_audio {
            self.attach_audio();
        }
        if action_back {
            self.trainer.end_session();
            self.answered_at = None;
            self.screen = Screen::Dashboard;
        }
    }

    fn open_edit_form(&mut self) {
        let Some(question) = self.trainer.question() else {
            return;
        };
        let Some(card) = self.trainer.card(&question.card_id) else {
            return;
        };
        self.edit_form = Some(CardForm {
            word: card.word.clone(),
            meaning: card.meaning.clone(),
            gender: card.gender,
            ..CardForm::default()
        });
    }

    fn save_edit_form(&mut self) {
        let Some(form) = &self.edit_form else {
            return;
        };
        match self.trainer.edit_current(&form.word, &form.meaning, form.gender) {
            Ok(()) => self.edit_form = None,
            Err(e) => self.report(e),
        }
    }

    /// One-shot capture: the picked file becomes the card's audio, a cancelled dialog discards it.
    fn attach_audio(&mut self) {
        let ticket = match self.trainer.begin_recording() {
            Ok(ticket) => ticket,
            Err(e) => return self.report(e),
        };

        let picked: Option<PathBuf> = rfd::FileDialog::new()
            .add_filter("Audio files", &["mp3", "ogg", "oga", "wav", "webm", "m4a"])
            .pick_file();
        let result = match picked {
            Some(path) => files::audio_data_url(&path)
                .and_then(|payload| self.trainer.finish_recording(ticket, &payload)),
            None => self.trainer.discard_recording(ticket),
        };
        if let Err(e) = result {
            self.report(e);
        }
    }

    fn render_summary(&mut self, ui: &mut egui::Ui) {
        let Some(summary) = self.trainer.last_summary().cloned() else {
            self.screen = Screen::Dashboard;
            return;
        };
        ui.vertical_centered(|ui| {
            ui.heading(summary.title());
            ui.add_space(10.0);
            ui.label(summary.message());
            ui.add_space(20.0);
            if ui.button("Back to Dashboard").clicked() {
                self.trainer.clear_summary();
                self.screen = Screen::Dashboard;
            }
        });
    }

    fn render_statistics(&mut self, ui: &mut egui::Ui) {
        ui.heading("Statistics");
        ui.horizontal(|ui| {
            ui.label("Show:");
            egui::ComboBox::from_id_salt("stats_filter")
                .selected_text(self.stats_filter.label())
                .show_ui(ui, |ui| {
                    for filter in StatsFilter::ALL {
                        ui.selectable_value(&mut self.stats_filter, filter, filter.label());
                    }
                });
        });
        ui.separator();

        let rows = self.trainer.statistics(self.stats_filter, self.stats_sort);
        if rows.is_empty() {
            ui.label("No cards match this filter.");
            return;
        }

        let mut action_sort: Option<SortColumn> = None;
        egui::Grid::new("stats_table").striped(true).show(ui, |ui| {
            for column in SortColumn::ALL {
                let arrow = match self.stats_sort {
                    Some((c, SortOrder::Ascending)) if c == column => " ^",
                    Some((c, SortOrder::Descending)) if c == column => " v",
                    _ => "",
                };
                if ui.button(format!("{}{}", column.label(), arrow)).clicked() {
                    action_sort = Some(column);
                }
            }
            ui.end_row();

            for row in &rows {
                ui.label(&row.word);
                ui.label(&row.meaning);
                ui.label(row.gender);
                ui.label(&row.note_preview);
                ui.label(if row.practiced { "Yes" } else { "No" });
                match row.success_rate {
                    Some(rate) => ui.label(format!(
                        "{:.0}% ({})",
                        rate * 100.0,
                        row.success_label.text()
                    )),
                    None => ui.label(row.success_label.text()),
                };
                match row.next_due_at {
                    Some(due) => ui.label(format!(
                        "{} ({})",
                        due.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                        row.due_label.text()
                    )),
                    None => ui.label(row.due_label.text()),
                };
                ui.label(if row.known { "Yes" } else { "No" });
                ui.end_row();
            }
        });

        if let Some(column) = action_sort {
            self.stats_sort = match self.stats_sort {
                Some((c, order)) if c == column => Some((column, order.toggled())),
                _ => Some((column, SortOrder::Ascending)),
            };
        }
    }

    fn render_import(&mut self, ui: &mut egui::Ui) {
        ui.heading("Bulk Add");
        ui.label("One card per line: word // meaning // [gender|note] // [note] // [image]");
        ui.add(
            egui::TextEdit::multiline(&mut self.bulk_text)
                .desired_rows(8)
                .desired_width(f32::INFINITY),
        );
        ui.horizontal(|ui| {
            if ui.button("Import Lines").clicked() {
                self.import_bulk_text();
            }
            if ui.button("Load Text File...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Text files", &["txt"])
                    .pick_file()
                {
                    match files::read_text(&path) {
                        Ok(content) => self.bulk_text = content,
                        Err(e) => self.report(e),
                    }
                }
            }
        });

        ui.separator();
        ui.heading("Backup");
        ui.label("The CSV backup holds every list and every card.");
        ui.horizontal(|ui| {
            if ui.button("Export Backup...").clicked() {
                self.handle_export();
            }
            if ui.button("Import Backup...").clicked() {
                self.handle_import_csv();
            }
        });

        ui.separator();
        ui.heading("Browser Edition");
        ui.label("Import the cards and lists JSON saved by the browser version.");
        if ui.button("Import JSON...").clicked() {
            self.handle_import_legacy();
        }
    }

    fn import_bulk_text(&mut self) {
        match self.trainer.import_bulk_text(&self.bulk_text) {
            Ok(report) => {
                self.bulk_text.clear();
                self.message = Some(report.message());
            }
            Err(e) => self.report(e),
        }
    }

    /// Handles backup export to a CSV file
    fn handle_export(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(self.trainer.backup_file_name())
            .add_filter("CSV files", &["csv"])
            .save_file()
        else {
            return;
        };
        let result = self
            .trainer
            .export_csv()
            .and_then(|content| files::write_text(&path, &content));
        match result {
            Ok(()) => self.message = Some(format!("Backup saved to {}", path.display())),
            Err(e) => self.report(e),
        }
    }

    fn handle_import_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file()
        else {
            return;
        };
        match files::read_text(&path) {
            Ok(content) => {
                self.run_destructive(Destructive::ImportCsv(content), Confirmation::Unconfirmed)
            }
            Err(e) => self.report(e),
        }
    }

    fn handle_import_legacy(&mut self) {
        let Some(cards_path) = rfd::FileDialog::new()
            .set_title("Select the cards JSON")
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };
        let lists_path = rfd::FileDialog::new()
            .set_title("Select the lists JSON (cancel if there is none)")
            .add_filter("JSON files", &["json"])
            .pick_file();

        let cards = match files::read_text(&cards_path) {
            Ok(content) => content,
            Err(e) => return self.report(e),
        };
        let lists = match lists_path.map(|path| files::read_text(&path)).transpose() {
            Ok(lists) => lists,
            Err(e) => return self.report(e),
        };
        self.run_destructive(
            Destructive::ImportLegacy { cards, lists },
            Confirmation::Unconfirmed,
        );
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        ui.heading("Settings");
        egui::Grid::new("settings_form").num_columns(2).show(ui, |ui| {
            ui.label("Cards per session:");
            ui.add(egui::DragValue::new(&mut self.settings_draft.batch_size).range(1..=200));
            ui.end_row();

            ui.label("Direction:");
            egui::ComboBox::from_id_salt("direction")
                .selected_text(self.settings_draft.direction.label())
                .show_ui(ui, |ui| {
                    for direction in [Direction::WordToMeaning, Direction::MeaningToWord] {
                        ui.selectable_value(
                            &mut self.settings_draft.direction,
                            direction,
                            direction.label(),
                        );
                    }
                });
            ui.end_row();

            ui.label("Answer display delay:");
            ui.add(
                egui::DragValue::new(&mut self.settings_draft.answer_delay_ms)
                    .range(0..=10_000)
                    .suffix(" ms"),
            );
            ui.end_row();

            ui.label("Night mode:");
            ui.checkbox(&mut self.settings_draft.night_mode, "");
            ui.end_row();
        });

        if &self.settings_draft != self.trainer.settings() {
            if let Err(e) = self.trainer.update_settings(self.settings_draft.clone()) {
                self.settings_draft = self.trainer.settings().clone();
                self.report(e);
            }
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(pending) = &self.confirm {
            let mut answer: Option<bool> = None;
            egui::Window::new("Please confirm")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&pending.prompt);
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            answer = Some(false);
                        }
                        if ui.button("Confirm").clicked() {
                            answer = Some(true);
                        }
                    });
                });

            match answer {
                Some(true) => {
                    if let Some(pending) = self.confirm.take() {
                        self.run_destructive(pending.action, Confirmation::Confirmed);
                    }
                }
                Some(false) => self.confirm = None,
                None => {}
            }
        }

        if let Some(message) = &self.message {
            let mut close = false;
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.message = None;
            }
        }
    }
}
