use image::Rgba;

/// Straight-alpha source-over: `top` painted on `base`.
pub fn alpha_over(base: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    // Fast path: fully transparent top pixel, nothing to blend
    if top[3] == 0 {
        return base;
    }
    // Fast path: opaque top pixel or empty base, just overwrite
    if top[3] == 255 || base[3] == 0 {
        return top;
    }

    let top_a = top[3] as f32 / 255.0;
    let base_a = base[3] as f32 / 255.0;
    let out_a = top_a + base_a * (1.0 - top_a);

    let channel = |i: usize| {
        let t = top[i] as f32 / 255.0;
        let b = base[i] as f32 / 255.0;
        let c = (t * top_a + b * base_a * (1.0 - top_a)) / out_a;
        (c * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

    #[test]
    fn transparent_top_keeps_base() {
        assert_eq!(alpha_over(RED, CLEAR), RED);
    }

    #[test]
    fn opaque_top_replaces_base() {
        assert_eq!(alpha_over(RED, BLUE), BLUE);
    }

    #[test]
    fn half_alpha_mixes() {
        let out = alpha_over(RED, Rgba([0, 0, 255, 128]));
        assert_eq!(out[3], 255);
        assert!((out[0] as i32 - 127).abs() <= 1);
        assert!((out[2] as i32 - 128).abs() <= 1);
    }

    #[test]
    fn translucent_over_translucent_accumulates_alpha() {
        let out = alpha_over(Rgba([255, 0, 0, 128]), Rgba([255, 0, 0, 128]));
        assert!(out[3] > 128);
        assert_eq!(out[0], 255);
    }
}
