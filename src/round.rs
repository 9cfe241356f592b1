//! The rounding operator: projects a carrier value onto a `(range,
//! precision)` reduced format under the active error regime.

use crate::carrier;
use crate::context::Context;

/// Rounds an arbitrary-width integer significand `c` (value `c · 2^exp`) to
/// `target_bits` significant bits, round-to-nearest-ties-to-even, and
/// returns the rounded `(significand, exponent)` pair with carry propagated
/// into the exponent when rounding overflows into one extra bit.
///
/// This is the one core both `round_normal` and `round_subnormal` share:
/// each calls it with a different `(c, exp, target_bits)` triple rather
/// than reimplementing the tie-break logic twice.
pub fn round_significand(c: u64, exp: i32, target_bits: u32) -> (u64, i32) {
    if c == 0 || target_bits == 0 {
        return (0, exp);
    }
    let width = 64 - c.leading_zeros();
    if width <= target_bits {
        return (c, exp);
    }
    let shift = width - target_bits;
    let half = 1u64 << (shift - 1);
    let mask = (1u64 << shift) - 1;
    let rem = c & mask;
    let mut rounded = c >> shift;
    let round_up = match rem.cmp(&half) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => rounded & 1 == 1,
    };
    let mut new_exp = exp + shift as i32;
    if round_up {
        rounded += 1;
        if 64 - rounded.leading_zeros() > target_bits {
            rounded >>= 1;
            new_exp += 1;
        }
    }
    (rounded, new_exp)
}

/// Chooses the mantissa width used by rounding under the absolute-error
/// regime, per the `{denormal, normal} x {relErr set, relErr unset}` table.
///
/// `p_carrier` is the carrier's own mantissa width (23 for single, 52 for
/// double); `prec` is the target relative precision; `exp_diff` is
/// `ex - absErrExp` (only meaningful, and only called, when `>= 0`);
/// `abs_err_exp` is the configured absolute-error exponent.
///
/// The denormal branches additionally clamp to `0`: the default
/// `absErrExp` is always non-positive (see the crate's context module), so
/// `min(|absErrExp|, prec)` and `absErrExp` are themselves non-negative in
/// the intended configuration, but a user-set positive `absErrExp` (an
/// unconstrained integer per the setter contract) must not produce a
/// negative width passed on to `round_significand`.
pub fn compute_abs_err_prec(
    denormal: bool,
    rel_err: bool,
    exp_diff: i32,
    prec: u32,
    p_carrier: u32,
    abs_err_exp: i32,
) -> u32 {
    if denormal {
        if rel_err {
            (abs_err_exp.unsigned_abs().min(prec)) as u32
        } else {
            abs_err_exp.max(0) as u32
        }
    } else {
        let diff = exp_diff.max(0) as u32;
        if rel_err {
            diff.min(prec)
        } else {
            diff.min(p_carrier)
        }
    }
}

macro_rules! round_impl {
    (
        $(#[$funcmeta:meta])*
        fn $roundfn:ident, carrier = $carrier:ident, float = $float:ty,
        prec = $prec:ident, range = $range:ident, p_carrier = $p_carrier:expr,
    ) => {
        $(#[$funcmeta])*
        pub fn $roundfn(x: $float, is_input: bool, ctx: &Context) -> $float {
            let prec = ctx.$prec();
            let range = ctx.$range();

            let fields = carrier::$carrier::decode(x);
            let class = carrier::$carrier::classify(&fields);
            if matches!(class, carrier::Class::Nan | carrier::Class::Infinite) {
                return x;
            }

            let emax: i32 = (1i32 << (range - 1)) - 1;
            let emin: i32 = 1 - emax;
            let ex = carrier::$carrier::unbiased_exp(&fields);

            if ex > emax {
                return x * <$float>::INFINITY;
            }

            if ex < emin {
                let flush = (is_input && ctx.daz()) || (!is_input && ctx.ftz());
                if flush {
                    return x * 0.0;
                }
                if x == 0.0 {
                    return x;
                }
                let prec_eff = if ctx.abs_err() {
                    compute_abs_err_prec(true, ctx.rel_err(), 0, prec, $p_carrier, ctx.abs_err_exp())
                } else {
                    prec
                };
                return round_subnormal_impl::$carrier(x, emin, prec_eff);
            }

            if !ctx.abs_err() {
                return round_normal_impl::$carrier(x, prec);
            }

            let exp_diff = ex - ctx.abs_err_exp();
            if exp_diff < -1 {
                return x * 0.0;
            }
            if exp_diff == -1 {
                return carrier::$carrier::pow2(ctx.abs_err_exp(), fields.sign);
            }
            let p_eff = compute_abs_err_prec(
                false,
                ctx.rel_err(),
                exp_diff,
                prec,
                $p_carrier,
                ctx.abs_err_exp(),
            );
            round_normal_impl::$carrier(x, p_eff)
        }
    };
}

/// `round_normal`/`round_subnormal` per carrier, kept callable on their own
/// so each matches the naming used for the underlying operation.
mod round_normal_impl {
    use super::carrier;
    use super::round_significand;

    pub fn single(x: f32, prec: u32) -> f32 {
        if x == 0.0 {
            return x;
        }
        let fields = carrier::single::decode(x);
        let ex = carrier::single::unbiased_exp(&fields);
        let implicit = if fields.biased_exp == 0 { 0u64 } else { 1u64 << carrier::single::MANT_BITS };
        let c = implicit | fields.mantissa;
        let target_bits = prec + 1;
        let (rounded, exp_adj) =
            round_significand(c, ex - carrier::single::MANT_BITS as i32, target_bits);
        carrier::single::from_significand(fields.sign, rounded, exp_adj)
    }

    pub fn double(x: f64, prec: u32) -> f64 {
        if x == 0.0 {
            return x;
        }
        let fields = carrier::double::decode(x);
        let ex = carrier::double::unbiased_exp(&fields);
        let implicit = if fields.biased_exp == 0 { 0u64 } else { 1u64 << carrier::double::MANT_BITS };
        let c = implicit | fields.mantissa;
        let target_bits = prec + 1;
        let (rounded, exp_adj) =
            round_significand(c, ex - carrier::double::MANT_BITS as i32, target_bits);
        carrier::double::from_significand(fields.sign, rounded, exp_adj)
    }
}

mod round_subnormal_impl {
    use super::carrier;
    use super::round_significand;

    /// Rounds `x` relative to the anchor exponent `emin`, to `p` significant
    /// bits of the mantissa counted from that anchor rather than from `x`'s
    /// own leading bit.
    pub fn single(x: f32, emin: i32, p: u32) -> f32 {
        let fields = carrier::single::decode(x);
        let ex = carrier::single::unbiased_exp(&fields);
        let implicit = if fields.biased_exp == 0 { 0u64 } else { 1u64 << carrier::single::MANT_BITS };
        let c = implicit | fields.mantissa;
        let anchor_shift = (emin - ex).max(0) as u32;
        let anchored = if anchor_shift >= 64 { 0 } else { c >> anchor_shift };
        let target_bits = p + 1;
        let (rounded, exp_adj) =
            round_significand(anchored, emin - carrier::single::MANT_BITS as i32, target_bits);
        carrier::single::from_significand(fields.sign, rounded, exp_adj)
    }

    pub fn double(x: f64, emin: i32, p: u32) -> f64 {
        let fields = carrier::double::decode(x);
        let ex = carrier::double::unbiased_exp(&fields);
        let implicit = if fields.biased_exp == 0 { 0u64 } else { 1u64 << carrier::double::MANT_BITS };
        let c = implicit | fields.mantissa;
        let anchor_shift = (emin - ex).max(0) as u32;
        let anchored = if anchor_shift >= 64 { 0 } else { c >> anchor_shift };
        let target_bits = p + 1;
        let (rounded, exp_adj) =
            round_significand(anchored, emin - carrier::double::MANT_BITS as i32, target_bits);
        carrier::double::from_significand(fields.sign, rounded, exp_adj)
    }
}

round_impl! {
    /// Rounds a single-precision value onto `(ctx.range32(), ctx.prec32())`.
    fn round32, carrier = single, float = f32, prec = prec32, range = range32, p_carrier = 23,
}

round_impl! {
    /// Rounds a double-precision value onto `(ctx.range64(), ctx.prec64())`.
    fn round64, carrier = double, float = f64, prec = prec64, range = range64, p_carrier = 52,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    #[test]
    fn round_significand_no_op_when_already_narrow() {
        assert_eq!(round_significand(0b101, 0, 8), (0b101, 0));
    }

    #[test]
    fn round_significand_ties_to_even() {
        assert_eq!(round_significand(0b10101, 0, 4), (0b1010, 1));
        assert_eq!(round_significand(0b10111, 0, 4), (0b1100, 1));
    }

    #[test]
    fn round_significand_carries_into_exponent() {
        // 0b1111 (15) rounds up to 0b10000 (16), which needs 5 bits; the
        // second carry shift renormalizes it back down to 3 significant
        // bits (0b100), bumping the exponent by one more than the initial
        // shift did, so the result still fits exactly in `target_bits`.
        assert_eq!(round_significand(0b1111, 0, 3), (0b100, 2));
    }

    #[test]
    fn ieee_mode_transparency_via_full_precision() {
        let ctx = Context::default();
        let x = 1.0f64 + 2f64.powi(-40);
        assert_eq!(round64(x, true, &ctx), x);
        assert_eq!(round32(1.0f32 + 2f32.powi(-20), true, &ctx), 1.0f32 + 2f32.powi(-20));
    }

    #[test]
    fn idempotence() {
        let mut ctx = Context::default();
        ctx.set_prec64(10).unwrap();
        ctx.set_range64(11).unwrap();
        let x = 1.0f64 + 2f64.powi(-3);
        let once = round64(x, true, &ctx);
        let twice = round64(once, true, &ctx);
        assert_eq!(once, twice);
    }

    #[test]
    fn sign_preservation_on_overflow() {
        let mut ctx = Context::default();
        ctx.set_range32(5).unwrap();
        ctx.set_prec32(10).unwrap();
        assert_eq!(round32(-1.0e40, true, &ctx), f32::NEG_INFINITY);
        assert_eq!(round32(1.0e40, true, &ctx), f32::INFINITY);
    }

    #[test]
    fn carrier_at_max_identity() {
        let ctx = Context::default();
        let x = 12345.6789f64;
        assert_eq!(round64(x, true, &ctx), x);
        let y = 12345.6789f32;
        assert_eq!(round32(y, true, &ctx), y);
    }

    #[test]
    fn overflow_lock() {
        let mut ctx = Context::default();
        ctx.set_range32(5).unwrap();
        assert_eq!(round32(1.0e40, true, &ctx), f32::INFINITY);
    }

    // Scenarios S1/S2 (OB-mode output rounding of a sum) are covered by
    // `scenario_s1_ob_mode_rounds_output`/`scenario_s2_ob_mode_keeps_on_ulp_increment`
    // in `crate::ops`'s tests, which drive them through `add_f64` rather than
    // summing pre-rounded inputs.

    #[test]
    fn scenario_s4_single_overflow() {
        let mut ctx = Context::default();
        ctx.set_range32(5).unwrap();
        ctx.set_prec32(23).unwrap();
        assert_eq!(round32(1.0e40, true, &ctx), f32::INFINITY);
    }

    #[test]
    fn scenario_s5_abs_error_floor_and_boundary() {
        // expDiff = ex - absErrExp. With absErrExp = -10, a value whose
        // normalized unbiased exponent is -12 gives expDiff = -2 (below the
        // floor); one with unbiased exponent -11 gives expDiff = -1, the
        // round-away boundary.
        let mut ctx = Context::default();
        ctx.set_error_mode(crate::context::ErrorMode::Abs).unwrap();
        ctx.set_abs_err_exp(-10).unwrap();
        let below = round64(3.0 * 2f64.powi(-13), false, &ctx);
        assert_eq!(below, 0.0);
        let boundary = round64(1.5 * 2f64.powi(-11), false, &ctx);
        assert_eq!(boundary, 2f64.powi(-10));
    }

    #[test]
    fn scenario_s6_bfloat16_preset() {
        let mut ctx = Context::default();
        ctx.apply_preset(crate::preset::Preset::Bfloat16).unwrap();
        let x = 1.0f32 + 2f32.powi(-8);
        assert_eq!(round32(x, true, &ctx), 1.0f32);
    }
}
