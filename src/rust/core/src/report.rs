// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Display formatting for shells. Computation never rounds; only these do.

pub fn format_strength(mpa: f64) -> String {
    format!("{:.2} MPa", mpa)
}

pub fn format_area_mm2(area_mm2: f64) -> String {
    format!("{:.0} mm²", area_mm2)
}

pub fn format_area_m2(area_m2: f64) -> String {
    format!("{:.4} m²", area_m2)
}

/// Plain-text line for a model prediction.
pub fn prediction_line(mpa: f64) -> String {
    format!("Predicted Compressive Strength: {}", format_strength(mpa))
}

/// Plain-text lines for a cube test.
pub fn load_test_lines(area_mm2: f64, area_m2: f64, strength_mpa: f64) -> Vec<String> {
    vec![
        format!(
            "Area: {} ({})",
            format_area_mm2(area_mm2),
            format_area_m2(area_m2)
        ),
        format!("Compressive Strength: {}", format_strength(strength_mpa)),
    ]
}
