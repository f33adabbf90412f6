use crate::domain::model::{ClassBands, ClassificationMode, Legend, LegendEntry};

/// Picks the active 5-color ramp for a band set.
pub fn ramp(bands: &ClassBands, color_blind: bool) -> &[String; 5] {
    if color_blind {
        &bands.colors_cb
    } else {
        &bands.colors
    }
}

/// Class index for a coerced attribute value: `v ≤ b1 → 0`,
/// `b1 < v ≤ b2 → 1`, …, `v > b4 → 4`. A value that failed numeric
/// coercion lands in the lowest class; the step expression evaluates the
/// same way on the surface, so the two can never disagree.
pub fn bucket_for(bands: &ClassBands, value: Option<f64>) -> usize {
    let Some(v) = value else { return 0 };
    bands.breaks[1..].iter().filter(|b| v > **b).count()
}

pub fn color_for(bands: &ClassBands, color_blind: bool, value: Option<f64>) -> &str {
    &ramp(bands, color_blind)[bucket_for(bands, value)]
}

pub fn legend_title(mode: ClassificationMode) -> &'static str {
    match mode {
        ClassificationMode::Temperature => "Heat (°C)",
        ClassificationMode::GreenCover => "Green/Blue (%)",
    }
}

/// Five legend entries pairing ramp colors with range labels. Bounds are
/// formatted to two decimal places; the first and last classes are open.
pub fn legend(mode: ClassificationMode, bands: &ClassBands, color_blind: bool) -> Legend {
    let colors = ramp(bands, color_blind);
    let b = &bands.breaks;

    let labels = [
        format!("< {:.2}", b[1]),
        format!("{:.2}–{:.2}", b[1], b[2]),
        format!("{:.2}–{:.2}", b[2], b[3]),
        format!("{:.2}–{:.2}", b[3], b[4]),
        format!("≥ {:.2}", b[4]),
    ];

    Legend {
        title: legend_title(mode).to_string(),
        entries: colors
            .iter()
            .zip(labels)
            .map(|(color, label)| LegendEntry {
                color: color.clone(),
                label,
            })
            .collect(),
    }
}
