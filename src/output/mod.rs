pub mod formatter;

pub use formatter::{
    csv_line, detail_url_at, format_breakdown, format_listing_detail, format_ranked_table,
    should_use_colors, to_csv, write_csv,
};
