//! Slot status styling. `console` disables colors when stdout is not a terminal
//! or `NO_COLOR` is set.

use console::{style, StyledObject};

use crate::domain::models::{SlotId, SlotState};

/// Bold section heading for a slot.
pub fn slot_heading(slot: SlotId) -> StyledObject<&'static str> {
    style(slot.name()).bold().underlined()
}

/// Green `ok`, red `failed`, dim `no result`.
pub fn slot_status<V>(state: &SlotState<V>) -> StyledObject<&'static str> {
    match state {
        SlotState::Value(_) => style("ok").green(),
        SlotState::Failed(_) => style("failed").red().bold(),
        SlotState::Unset => style("no result").dim(),
    }
}
