use crate::config::{Config, Precision};
use crate::controller::AppController;

pub struct KokoroApp {
    pub(crate) controller: AppController,
    pub(crate) config: Config,
    /// Precision picked in the combo box, applied on the next reload
    pub(crate) precision_choice: Precision,
    pub(crate) saved_voice: String,
    /// Text the language hint was last computed for, and its result
    pub(crate) hint_text: String,
    pub(crate) hint_non_english: bool,
}

impl KokoroApp {
    pub fn new(controller: AppController, config: Config) -> Self {
        Self {
            precision_choice: config.precision,
            saved_voice: config.voice.clone(),
            hint_text: String::new(),
            hint_non_english: false,
            controller,
            config,
        }
    }
}
