//! Color ramp and drawing constants.

/// Fill for no-data and zero-value districts.
pub const NO_DATA_COLOR: &str = "#eeeeee";

/// District outline color.
pub const STROKE_COLOR: &str = "#666";

/// District outline width.
pub const STROKE_WIDTH: f64 = 0.5;

/// Fill opacity for districts dimmed by the high-risk threshold.
pub const DIM_OPACITY: f64 = 0.2;

/// Viridis anchor colors, low to high.
pub const VIRIDIS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

/// Hex color at position `t` along the viridis ramp, interpolating
/// linearly between the two nearest anchors. `t` is clamped into
/// `0.0..=1.0`.
#[must_use]
pub fn viridis(t: f64) -> String {
    let t = t.clamp(0.0, 1.0);

    #[allow(clippy::cast_precision_loss)] // anchor count is tiny
    let x = t * (VIRIDIS.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // x is non-negative
    let index = (x.floor() as usize).min(VIRIDIS.len() - 2);
    #[allow(clippy::cast_precision_loss)]
    let fraction = x - index as f64;

    let (r0, g0, b0) = VIRIDIS[index];
    let (r1, g1, b1) = VIRIDIS[index + 1];

    format!(
        "#{:02x}{:02x}{:02x}",
        lerp_channel(r0, r1, fraction),
        lerp_channel(g0, g1, fraction),
        lerp_channel(b0, b1, fraction)
    )
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // result stays in 0..=255
fn lerp_channel(from: u8, to: u8, fraction: f64) -> u8 {
    f64::from(from).mul_add(1.0 - fraction, f64::from(to) * fraction).round() as u8
}

/// Hex color of one anchor, for gradient stops.
#[must_use]
pub fn anchor_hex(index: usize) -> String {
    let (r, g, b) = VIRIDIS[index.min(VIRIDIS.len() - 1)];
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_the_anchors() {
        assert_eq!(viridis(0.0), "#440154");
        assert_eq!(viridis(1.0), "#fde725");
    }

    #[test]
    fn midpoint_lands_on_the_center_anchor() {
        // 8 segments: t = 0.5 is exactly anchor 4.
        assert_eq!(viridis(0.5), "#21908d");
    }

    #[test]
    fn out_of_range_positions_clamp() {
        assert_eq!(viridis(-2.0), viridis(0.0));
        assert_eq!(viridis(7.5), viridis(1.0));
    }

    #[test]
    fn interpolates_between_anchors() {
        // Halfway between (68,1,84) and (71,44,122).
        assert_eq!(viridis(0.0625), "#461767");
    }

    #[test]
    fn anchor_hex_formats() {
        assert_eq!(anchor_hex(0), "#440154");
        assert_eq!(anchor_hex(8), "#fde725");
        assert_eq!(anchor_hex(99), "#fde725");
    }
}
