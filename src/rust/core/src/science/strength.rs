// SPDX-FileCopyrightText: 2026 Santhosh Shyamsundar, Prabhu S., and Studio Tyto
// SPDX-License-Identifier: MIT
use serde::Serialize;

/// EN 206 compressive strength class, keyed on cube strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StrengthClass {
    #[serde(rename = "below C8/10")]
    BelowC8,
    #[serde(rename = "C8/10")]
    C8,
    #[serde(rename = "C12/15")]
    C12,
    #[serde(rename = "C16/20")]
    C16,
    #[serde(rename = "C20/25")]
    C20,
    #[serde(rename = "C25/30")]
    C25,
    #[serde(rename = "C30/37")]
    C30,
    #[serde(rename = "C35/45")]
    C35,
    #[serde(rename = "C40/50")]
    C40,
    #[serde(rename = "C45/55")]
    C45,
    #[serde(rename = "C50/60")]
    C50,
    #[serde(rename = "C55/67")]
    C55,
    #[serde(rename = "C60+")]
    C60Plus,
}

impl StrengthClass {
    /// Highest class whose characteristic cube strength does not exceed `cube_mpa`.
    pub fn classify(cube_mpa: f64) -> Self {
        if cube_mpa < 10.0 {
            return StrengthClass::BelowC8;
        }
        if cube_mpa < 15.0 {
            return StrengthClass::C8;
        }
        if cube_mpa < 20.0 {
            return StrengthClass::C12;
        }
        if cube_mpa < 25.0 {
            return StrengthClass::C16;
        }
        if cube_mpa < 30.0 {
            return StrengthClass::C20;
        }
        if cube_mpa < 37.0 {
            return StrengthClass::C25;
        }
        if cube_mpa < 45.0 {
            return StrengthClass::C30;
        }
        if cube_mpa < 50.0 {
            return StrengthClass::C35;
        }
        if cube_mpa < 55.0 {
            return StrengthClass::C40;
        }
        if cube_mpa < 60.0 {
            return StrengthClass::C45;
        }
        if cube_mpa < 67.0 {
            return StrengthClass::C50;
        }
        if cube_mpa < 75.0 {
            return StrengthClass::C55;
        }
        StrengthClass::C60Plus
    }

    pub fn label(self) -> &'static str {
        match self {
            StrengthClass::BelowC8 => "below C8/10",
            StrengthClass::C8 => "C8/10",
            StrengthClass::C12 => "C12/15",
            StrengthClass::C16 => "C16/20",
            StrengthClass::C20 => "C20/25",
            StrengthClass::C25 => "C25/30",
            StrengthClass::C30 => "C30/37",
            StrengthClass::C35 => "C35/45",
            StrengthClass::C40 => "C40/50",
            StrengthClass::C45 => "C45/55",
            StrengthClass::C50 => "C50/60",
            StrengthClass::C55 => "C55/67",
            StrengthClass::C60Plus => "C60+",
        }
    }
}
