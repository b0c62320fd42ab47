//! Quality selection keyboard and its callback data
//!
//! Callback data is `q:<preset id>:<session generation>`. The generation ties
//! a button to the link it was shown for; see `storage::session`.

use teloxide::types::InlineKeyboardMarkup;

use crate::download::preset::QualityPreset;
use crate::telegram::cb;

/// Prefix that routes a callback query to the quality handler
pub const CALLBACK_PREFIX: &str = "q:";

/// Buttons per keyboard row
const BUTTONS_PER_ROW: usize = 2;

pub fn callback_data(preset: QualityPreset, generation: u64) -> String {
    format!("{}{}:{}", CALLBACK_PREFIX, preset.id(), generation)
}

/// Parses `q:<preset>:<generation>`; anything else is `None`.
pub fn parse_callback(data: &str) -> Option<(QualityPreset, u64)> {
    let rest = data.strip_prefix(CALLBACK_PREFIX)?;
    let (preset, generation) = rest.rsplit_once(':')?;
    Some((preset.parse().ok()?, generation.parse().ok()?))
}

/// One button per offered preset, two per row.
pub fn create_quality_keyboard(presets: &[QualityPreset], generation: u64) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<_>> = presets
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| {
            chunk
                .iter()
                .map(|preset| cb(preset.label(), callback_data(*preset, generation)))
                .collect()
        })
        .collect();

    log::debug!(
        "Created quality keyboard: {} buttons in {} rows (generation {})",
        presets.len(),
        rows.len(),
        generation
    );
    InlineKeyboardMarkup::new(rows)
}
