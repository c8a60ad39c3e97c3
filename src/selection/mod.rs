pub mod filters;
pub mod state;

use tracing::debug;

use crate::types::ToolRecord;
pub use filters::{
    active_stages, CategoryFilter, FilterStage, TagFilter, TextFilter, TypeFilter,
};
pub use state::{FilterState, ParseToolTypeError, ToolType};

/// Records that pass every active stage, borrowed, in input order.
pub fn select<'a>(records: &'a [ToolRecord], state: &FilterState) -> Vec<&'a ToolRecord> {
	let mut visible: Vec<&ToolRecord> = records.iter().collect();

	// Each stage narrows the output of the previous one.
	for stage in active_stages(state) {
		let before = visible.len();
		visible.retain(|record| stage.keep(record));
		debug!(stage = stage.name(), before, after = visible.len(), "filter stage applied");
	}

	debug_assert!(is_subsequence(&visible, records));

	visible
}

/// Owned variant of [`select`].
pub fn apply(records: &[ToolRecord], state: &FilterState) -> Vec<ToolRecord> {
	select(records, state).into_iter().cloned().collect()
}

fn is_subsequence(visible: &[&ToolRecord], records: &[ToolRecord]) -> bool {
	let mut remaining = records.iter();
	visible
		.iter()
		.all(|v| remaining.any(|r| std::ptr::eq(*v, r)))
}
