use super::figure::{Figure, Series, TextBlock};
use super::styles::StyleSnapshot;

/// Applies a style snapshot uniformly to finished figures.
///
/// Construction routines pick whatever font sizes they like; the styler
/// overwrites them afterwards so every figure of a batch looks the same.
/// Regions a figure does not have (no title, no legend, unlabeled axes) are
/// skipped. Applying the same snapshot twice gives the same figure.
pub struct FigureStyler;

impl FigureStyler {
    pub fn apply(mut figure: Figure, style: &StyleSnapshot) -> Figure {
        Self::apply_in_place(&mut figure, style);
        figure
    }

    pub fn apply_in_place(figure: &mut Figure, style: &StyleSnapshot) {
        let fonts = style.fonts();
        let line = style.line();

        set_size(figure.title.as_mut(), fonts.title);
        if let Some(legend) = figure.legend.as_mut() {
            legend.font_size = fonts.legend;
        }

        for panel in &mut figure.panels {
            // Subplot captions sit at axis scale
            set_size(panel.title.as_mut(), fonts.axis);
            for axis in [&mut panel.x_axis, &mut panel.y_axis] {
                set_size(axis.label.as_mut(), fonts.axis);
                axis.tick_font_size = fonts.axis;
            }
            for series in &mut panel.series {
                if let Series::Line(trace) = series {
                    trace.width = line.width;
                    if let Some(marker) = trace.marker.as_mut() {
                        marker.size = line.marker_size;
                    }
                }
            }
        }
    }
}

fn set_size(block: Option<&mut TextBlock>, size: u32) {
    if let Some(block) = block {
        block.font_size = size;
    }
}
