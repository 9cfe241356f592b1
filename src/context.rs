//! The parameter record threaded through every rounding and arithmetic
//! call: target precision/range per carrier, operating mode, error-mode
//! flags, and the denormal flush flags.

use crate::error::VprecError;
use crate::preset::Preset;

/// Magnitude of the minimum normal unbiased exponent of a binary64
/// (`1022`, since the true unbiased minimum is `-1022`). The default
/// `absErrExp` is this value's negation, `-1022`, matching the contract
/// that a default-configured `Context` never activates the absolute-error
/// denormal clamp in [`crate::round::compute_abs_err_prec`].
const MIN_NORMAL_EXP_DOUBLE: i32 = crate::carrier::double::BIAS - 1;

/// How a wrapped arithmetic operator applies rounding around the carrier's
/// native operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Transparent passthrough; no rounding.
    Ieee,
    /// Round inputs and outputs.
    Full,
    /// Round inputs only.
    Ib,
    /// Round output only.
    Ob,
}

impl Mode {
    pub fn parse(value: &str) -> Result<Mode, VprecError> {
        match value.to_ascii_lowercase().as_str() {
            "ieee" => Ok(Mode::Ieee),
            "full" => Ok(Mode::Full),
            "ib" => Ok(Mode::Ib),
            "ob" => Ok(Mode::Ob),
            _ => Err(VprecError::InvalidMode { value: value.to_string() }),
        }
    }
}

/// The error regime a rounding call operates under, encoded at the API
/// boundary as a closed enum (`spec.md` §4.4's mode-to-error-mode table)
/// while the `Context` continues to store the two booleans it expands to,
/// so "at least one of relErr/absErr is true" stays enforced in one place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorMode {
    Rel,
    Abs,
    All,
}

impl ErrorMode {
    pub fn parse(value: &str) -> Result<ErrorMode, VprecError> {
        match value.to_ascii_lowercase().as_str() {
            "rel" => Ok(ErrorMode::Rel),
            "abs" => Ok(ErrorMode::Abs),
            "all" => Ok(ErrorMode::All),
            _ => Err(VprecError::InvalidErrorMode { value: value.to_string() }),
        }
    }

    fn flags(self) -> (bool, bool) {
        match self {
            ErrorMode::Rel => (true, false),
            ErrorMode::Abs => (false, true),
            ErrorMode::All => (true, true),
        }
    }
}

/// Variable-precision parameters and lifecycle state for the core.
///
/// Created with [`Context::default`], mutated only through the validated
/// setters below, and read (never mutated) by every rounding/arithmetic
/// call. There is no explicit destructor: the value is owned and dropped
/// by the host like any other Rust value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Context {
    prec32: u32,
    prec64: u32,
    range32: u32,
    range64: u32,
    mode: Mode,
    rel_err: bool,
    abs_err: bool,
    abs_err_exp: i32,
    daz: bool,
    ftz: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            prec32: 23,
            prec64: 52,
            range32: 8,
            range64: 11,
            mode: Mode::Ob,
            rel_err: true,
            abs_err: false,
            abs_err_exp: -MIN_NORMAL_EXP_DOUBLE,
            daz: false,
            ftz: false,
        }
    }
}

impl Context {
    pub fn prec32(&self) -> u32 {
        self.prec32
    }
    pub fn prec64(&self) -> u32 {
        self.prec64
    }
    pub fn range32(&self) -> u32 {
        self.range32
    }
    pub fn range64(&self) -> u32 {
        self.range64
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn rel_err(&self) -> bool {
        self.rel_err
    }
    pub fn abs_err(&self) -> bool {
        self.abs_err
    }
    pub fn abs_err_exp(&self) -> i32 {
        self.abs_err_exp
    }
    pub fn daz(&self) -> bool {
        self.daz
    }
    pub fn ftz(&self) -> bool {
        self.ftz
    }

    /// Current error mode, recovered from the two stored booleans. Always
    /// one of the three valid combinations; "neither set" cannot occur
    /// because `set_error_mode` is the only way to change these flags.
    pub fn error_mode(&self) -> ErrorMode {
        match (self.rel_err, self.abs_err) {
            (true, false) => ErrorMode::Rel,
            (false, true) => ErrorMode::Abs,
            (true, true) => ErrorMode::All,
            (false, false) => unreachable!("Context must always have relErr or absErr set"),
        }
    }

    pub fn set_prec32(&mut self, value: u32) -> Result<(), VprecError> {
        if (1..=23).contains(&value) {
            self.prec32 = value;
            Ok(())
        } else {
            Err(VprecError::InvalidParameter { field: "prec32", value: value as i64 })
        }
    }

    pub fn set_prec64(&mut self, value: u32) -> Result<(), VprecError> {
        if (1..=52).contains(&value) {
            self.prec64 = value;
            Ok(())
        } else {
            Err(VprecError::InvalidParameter { field: "prec64", value: value as i64 })
        }
    }

    pub fn set_range32(&mut self, value: u32) -> Result<(), VprecError> {
        if (2..=8).contains(&value) {
            self.range32 = value;
            Ok(())
        } else {
            Err(VprecError::InvalidParameter { field: "range32", value: value as i64 })
        }
    }

    pub fn set_range64(&mut self, value: u32) -> Result<(), VprecError> {
        if (2..=11).contains(&value) {
            self.range64 = value;
            Ok(())
        } else {
            Err(VprecError::InvalidParameter { field: "range64", value: value as i64 })
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// Sets the error mode, explicitly assigning both flags for `All`
    /// rather than relying on fall-through between match arms.
    pub fn set_error_mode(&mut self, mode: ErrorMode) -> Result<(), VprecError> {
        let (rel_err, abs_err) = mode.flags();
        self.rel_err = rel_err;
        self.abs_err = abs_err;
        Ok(())
    }

    pub fn set_abs_err_exp(&mut self, value: i32) -> Result<(), VprecError> {
        self.abs_err_exp = value;
        Ok(())
    }

    pub fn set_daz(&mut self, value: bool) {
        self.daz = value;
    }

    pub fn set_ftz(&mut self, value: bool) {
        self.ftz = value;
    }

    /// Applies a named preset to both carriers' `(prec, range)` pair.
    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), VprecError> {
        let single = preset.single().expect("every Preset variant defines single fields");
        let double = preset.double().expect("every Preset variant defines double fields");
        self.set_prec32(single.prec)?;
        self.set_range32(single.range)?;
        self.set_prec64(double.prec)?;
        self.set_range64(double.range)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_full_carrier_precision() {
        let ctx = Context::default();
        assert_eq!(ctx.prec32(), 23);
        assert_eq!(ctx.range32(), 8);
        assert_eq!(ctx.prec64(), 52);
        assert_eq!(ctx.range64(), 11);
        assert_eq!(ctx.mode(), Mode::Ob);
        assert!(ctx.rel_err());
        assert!(!ctx.abs_err());
        assert!(!ctx.daz());
        assert!(!ctx.ftz());
        assert!(ctx.abs_err_exp() <= 0);
    }

    #[test]
    fn setter_rejects_out_of_range_and_leaves_state_unchanged() {
        let mut ctx = Context::default();
        let before = ctx;
        assert!(ctx.set_prec32(0).is_err());
        assert!(ctx.set_prec32(24).is_err());
        assert!(ctx.set_range64(1).is_err());
        assert!(ctx.set_range64(12).is_err());
        assert_eq!(ctx, before);
    }

    #[test]
    fn setter_accepts_boundary_values() {
        let mut ctx = Context::default();
        assert!(ctx.set_prec32(1).is_ok());
        assert!(ctx.set_prec32(23).is_ok());
        assert!(ctx.set_range64(2).is_ok());
        assert!(ctx.set_range64(11).is_ok());
    }

    #[test]
    fn error_mode_round_trips() {
        let mut ctx = Context::default();
        ctx.set_error_mode(ErrorMode::Abs).unwrap();
        assert_eq!(ctx.error_mode(), ErrorMode::Abs);
        assert!(!ctx.rel_err());
        assert!(ctx.abs_err());

        ctx.set_error_mode(ErrorMode::All).unwrap();
        assert_eq!(ctx.error_mode(), ErrorMode::All);
        assert!(ctx.rel_err());
        assert!(ctx.abs_err());

        ctx.set_error_mode(ErrorMode::Rel).unwrap();
        assert_eq!(ctx.error_mode(), ErrorMode::Rel);
        assert!(ctx.rel_err());
        assert!(!ctx.abs_err());
    }

    #[test]
    fn preset_bijection_all_presets() {
        let table: &[(Preset, u32, u32)] = &[
            (Preset::Binary16, 10, 5),
            (Preset::Binary32, 23, 8),
            (Preset::Bfloat16, 7, 8),
            (Preset::Tensorfloat, 10, 8),
            (Preset::Fp24, 16, 7),
            (Preset::Pxr24, 15, 8),
        ];
        for &(preset, prec, range) in table {
            let mut ctx = Context::default();
            ctx.apply_preset(preset).unwrap();
            assert_eq!(ctx.prec32(), prec);
            assert_eq!(ctx.range32(), range);
            assert_eq!(ctx.prec64(), prec);
            assert_eq!(ctx.range64(), range);
        }
    }

    #[test]
    fn mode_parse() {
        assert_eq!(Mode::parse("ieee"), Ok(Mode::Ieee));
        assert_eq!(Mode::parse("FULL"), Ok(Mode::Full));
        assert!(Mode::parse("bogus").is_err());
    }
}
