pub mod footer;
pub mod header;
pub mod utils;

pub use footer::draw_footer;
pub use header::draw_header;
pub use utils::{ability_label, capitalize, dex_number, stat_bar, stat_label, truncate, type_color};
