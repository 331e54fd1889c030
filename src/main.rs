mod app;
use vocab_trainer::*;

use app::TrainerApp;
use log::info;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = Config::from_env();
    info!("Using database at {}", config.db_path.display());

    let store = SqliteStore::open(&config.db_path).expect("Failed to open database");
    let trainer = Trainer::load(store).expect("Failed to load word lists from database");

    info!(
        "Loaded {} lists, active list has {} cards",
        trainer.lists().len(),
        trainer.cards().len()
    );
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Vocabulary Trainer",
        options,
        Box::new(|_cc| Ok(Box::new(TrainerApp::new(trainer)))),
    )
}
