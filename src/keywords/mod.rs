// Keyword acquisition — fetching candidate words for a theme and turning
// them into a stemmed keyword set.

pub mod bukvarix;
pub mod pipeline;
pub mod traits;
