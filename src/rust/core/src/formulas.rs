// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
//! Load-Test Formulas for Concrete Cubes
//!
//! Pure scalar functions. Validation lives in `science::load_test`;
//! these assume their inputs are already in range.
//!
//! References:
//! - EN 12390-3: Compressive strength of test specimens
//! - IS 516: Methods of tests for strength of concrete

use wasm_bindgen::prelude::*;

/// mm² per m².
pub const MM2_PER_M2: f64 = 1_000_000.0;

/// N per kN.
pub const N_PER_KN: f64 = 1000.0;

// ============================================================================
// GEOMETRY
// ============================================================================

/// Loaded face area of a cube specimen.
///
/// # Arguments
/// * `side_mm` - Cube side length in mm (150 mm standard, 100 mm small)
///
/// # Returns
/// Area in mm²
#[wasm_bindgen]
pub fn cube_area_mm2(side_mm: f64) -> f64 {
    side_mm * side_mm
}

#[wasm_bindgen]
pub fn mm2_to_m2(area_mm2: f64) -> f64 {
    area_mm2 / MM2_PER_M2
}

// ============================================================================
// STRESS
// ============================================================================

#[wasm_bindgen]
pub fn kn_to_n(load_kn: f64) -> f64 {
    load_kn * N_PER_KN
}

/// Compressive stress at failure.
///
/// f_c = F / A, with F in N and A in mm², which is N/mm² = MPa
///
/// # Arguments
/// * `load_kn` - Maximum load at failure in kN
/// * `area_mm2` - Loaded area in mm²
#[wasm_bindgen]
pub fn stress_mpa(load_kn: f64, area_mm2: f64) -> f64 {
    kn_to_n(load_kn) / area_mm2
}

// ============================================================================
// TESTS
// ============================================================================
