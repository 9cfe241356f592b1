//! Named precision/range presets, mirroring `interflop_vprec.h`'s
//! `vprec_preset` table.

use crate::error::VprecError;

/// A named `(precision, range)` pair applicable to either carrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Binary16,
    Binary32,
    Bfloat16,
    Tensorfloat,
    Fp24,
    Pxr24,
}

/// Precision and range, in bits, for a preset applied to a given carrier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresetFields {
    pub prec: u32,
    pub range: u32,
}

impl Preset {
    /// Parses a preset name as accepted by `--preset`. Case-insensitive,
    /// accepting both `binary16` and `fp16`-style aliases the way the
    /// original CLI's `argp` option strings did.
    pub fn parse(name: &str) -> Result<Preset, VprecError> {
        match name.to_ascii_lowercase().as_str() {
            "binary16" | "fp16" | "half" => Ok(Preset::Binary16),
            "binary32" | "fp32" | "single" => Ok(Preset::Binary32),
            "bfloat16" | "bf16" => Ok(Preset::Bfloat16),
            "tensorfloat" | "tf32" => Ok(Preset::Tensorfloat),
            "fp24" => Ok(Preset::Fp24),
            "pxr24" => Ok(Preset::Pxr24),
            _ => Err(VprecError::UnknownPreset { name: name.to_string() }),
        }
    }

    /// Fields this preset imposes on the 32-bit carrier, if defined for it.
    pub fn single(self) -> Option<PresetFields> {
        match self {
            Preset::Binary16 => Some(PresetFields { prec: 10, range: 5 }),
            Preset::Binary32 => Some(PresetFields { prec: 23, range: 8 }),
            Preset::Bfloat16 => Some(PresetFields { prec: 7, range: 8 }),
            Preset::Tensorfloat => Some(PresetFields { prec: 10, range: 8 }),
            Preset::Fp24 => Some(PresetFields { prec: 16, range: 7 }),
            Preset::Pxr24 => Some(PresetFields { prec: 15, range: 8 }),
        }
    }

    /// Fields this preset imposes on the 64-bit carrier. Every preset here
    /// targets a format narrower than double, so the 64-bit fields are the
    /// same bit counts reused against the wider carrier's wider limits.
    pub fn double(self) -> Option<PresetFields> {
        self.single().map(|f| PresetFields { prec: f.prec, range: f.range })
    }
}
