//! Surface transform to native window transform mapping.

/// Native window transform bits, as understood by
/// `NATIVE_WINDOW_SET_BUFFERS_TRANSFORM`.
pub const TRANSFORM_IDENTITY: i32 = 0;
pub const TRANSFORM_MIRROR_HORIZONTAL: i32 = 1 << 0;
pub const TRANSFORM_MIRROR_VERTICAL: i32 = 1 << 1;
pub const TRANSFORM_ROTATE_90: i32 = 1 << 2;
pub const TRANSFORM_ROTATE_180: i32 = TRANSFORM_MIRROR_HORIZONTAL | TRANSFORM_MIRROR_VERTICAL;
pub const TRANSFORM_ROTATE_270: i32 = TRANSFORM_ROTATE_180 | TRANSFORM_ROTATE_90;

/// Maps a surface transform code from the managed side to a native window
/// transform.
///
/// The managed side sends the Vulkan surface transform bit shifted left by
/// one, so the code is shifted back before matching. With
/// `orientation_flipped` set, a 180 degree rotation collapses to identity
/// because the panel itself is already mounted upside down.
///
/// Unrecognized codes map to identity. The `0x100` (inherit) arm is
/// identical to the default; it is kept spelled out because the managed side
/// can send it and the mapping for it is part of the contract.
pub fn map_surface_transform(raw: i32, orientation_flipped: bool) -> i32 {
    match raw >> 1 {
        0x1 => TRANSFORM_IDENTITY,
        0x2 => TRANSFORM_ROTATE_90,
        0x4 if orientation_flipped => TRANSFORM_IDENTITY,
        0x4 => TRANSFORM_ROTATE_180,
        0x8 => TRANSFORM_ROTATE_270,
        0x10 => TRANSFORM_MIRROR_HORIZONTAL,
        0x20 => TRANSFORM_MIRROR_HORIZONTAL | TRANSFORM_ROTATE_90,
        0x40 => TRANSFORM_MIRROR_VERTICAL,
        0x80 => TRANSFORM_MIRROR_VERTICAL | TRANSFORM_ROTATE_90,
        0x100 => TRANSFORM_IDENTITY,
        _ => TRANSFORM_IDENTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_270_ignores_orientation_flag() {
        // post-shift code 0x8
        assert_eq!(map_surface_transform(0x8 << 1, false), TRANSFORM_ROTATE_270);
        assert_eq!(map_surface_transform(0x8 << 1, true), TRANSFORM_ROTATE_270);
    }

    #[test]
    fn rotation_180_respects_orientation_flag() {
        // post-shift code 0x4
        assert_eq!(map_surface_transform(0x4 << 1, false), TRANSFORM_ROTATE_180);
        assert_eq!(map_surface_transform(0x4 << 1, true), TRANSFORM_IDENTITY);
    }

    #[test]
    fn identity_and_simple_rotations() {
        assert_eq!(map_surface_transform(0x1 << 1, false), TRANSFORM_IDENTITY);
        assert_eq!(map_surface_transform(0x2 << 1, false), TRANSFORM_ROTATE_90);
    }

    #[test]
    fn mirrored_states() {
        assert_eq!(
            map_surface_transform(0x10 << 1, false),
            TRANSFORM_MIRROR_HORIZONTAL
        );
        assert_eq!(
            map_surface_transform(0x20 << 1, false),
            TRANSFORM_MIRROR_HORIZONTAL | TRANSFORM_ROTATE_90
        );
        assert_eq!(
            map_surface_transform(0x40 << 1, false),
            TRANSFORM_MIRROR_VERTICAL
        );
        assert_eq!(
            map_surface_transform(0x80 << 1, false),
            TRANSFORM_MIRROR_VERTICAL | TRANSFORM_ROTATE_90
        );
    }

    #[test]
    fn inherit_and_unknown_codes_map_to_identity() {
        assert_eq!(map_surface_transform(0x100 << 1, false), TRANSFORM_IDENTITY);
        assert_eq!(map_surface_transform(0x100 << 1, true), TRANSFORM_IDENTITY);
        assert_eq!(map_surface_transform(0, false), TRANSFORM_IDENTITY);
        assert_eq!(map_surface_transform(0x7777, false), TRANSFORM_IDENTITY);
    }

    #[test]
    fn orientation_flag_only_affects_rotation_180() {
        // every recognized code except post-shift 0x4, plus some unknowns
        for raw in [
            0x1 << 1,
            0x2 << 1,
            0x8 << 1,
            0x10 << 1,
            0x20 << 1,
            0x40 << 1,
            0x80 << 1,
            0x100 << 1,
            0,
            0x7777,
        ] {
            assert_eq!(
                map_surface_transform(raw, false),
                map_surface_transform(raw, true),
                "flag changed mapping of code {raw:#x}"
            );
        }
    }
}
