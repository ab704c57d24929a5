//! Charts module - chart payload shaping

mod payload;
mod shaper;

pub use payload::{
    BarPayload, HeatmapPayload, IncreaseBarPayload, ScatterTrace, StateGrowth, StateTrace,
};
pub use shaper::{
    average_bar, choropleth, heatmap_matrix, increase_bar, line_series, scatter_series,
};
