//! Background geometry resolution: size, position, and natural-space mapping.
//!
//! Resolves a CSS-style background size specification into a rendered box,
//! positions that box inside its container, and maps a container-space
//! target back into the image's natural pixel space as a clamped square
//! crop. Pure geometry — no pixel operations, no allocations, `no_std`
//! compatible.
//!
//! # Example
//!
//! ```
//! use bannerlayout::geometry::{Point, PositionSpec, Rect, Size, SizeSpec, map_and_crop};
//!
//! let natural = Size::new(2480.0, 520.0);
//! let container = Size::new(1240.0, 260.0);
//!
//! let rendered = SizeSpec::Cover.resolve(natural, container);
//! let offset = PositionSpec::default().resolve(container, rendered);
//!
//! let avatar = Rect::new(40.0, 60.0, 160.0, 160.0);
//! let crop = map_and_crop(avatar, Point::new(0.0, 0.0), rendered, offset, natural);
//!
//! assert!(crop.x >= 0.0 && crop.y >= 0.0);
//! assert!(crop.x + crop.size <= natural.width);
//! assert!(crop.y + crop.size <= natural.height);
//! ```

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Absolute point in page coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in page coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center point of the rect.
    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point {
            x: self.left,
            y: self.top,
        }
    }

    /// Dimensions of the rect.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

/// Offset of the rendered box's top-left within its container.
///
/// Negative when the rendered box overflows the container (as under
/// [`SizeSpec::Cover`]). Never clamped — overflow is how cover crops.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    /// Create a new offset.
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// One axis of an explicit background size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SizeValue {
    /// Absolute length in pixels.
    Pixels(f64),
    /// Percentage of the container dimension on the same axis.
    Percent(f64),
    /// Derived from the other axis, preserving natural aspect ratio.
    Auto,
}

/// How the background image is sized inside its container.
///
/// The supported subset of CSS `background-size`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SizeSpec {
    /// Scale to fully cover the container, preserving aspect ratio.
    /// May overflow the container on one axis.
    Cover,
    /// Scale to fit entirely inside the container, preserving aspect
    /// ratio. May underflow the container on one axis.
    Contain,
    /// Per-axis explicit values. Axes resolve independently and may
    /// distort aspect ratio; a single `Auto` axis derives from the other.
    Explicit { x: SizeValue, y: SizeValue },
}

impl SizeSpec {
    /// Resolve the rendered dimensions of the image inside the container.
    ///
    /// Total over all inputs with positive `natural` dimensions (the
    /// caller contract — see [`crate::measure`], which never invokes the
    /// engine without a natural size).
    ///
    /// Unsupported [`Explicit`](Self::Explicit) combinations (both axes
    /// `Auto`, or mixed `Pixels`/`Percent`) fall back to [`Cover`](Self::Cover).
    pub fn resolve(self, natural: Size, container: Size) -> Size {
        use SizeValue::*;
        match self {
            Self::Cover | Self::Contain => scale_to_box(natural, container, self == Self::Cover),
            Self::Explicit { x, y } => match (x, y) {
                (Pixels(w), Pixels(h)) => Size::new(w, h),
                (Pixels(w), Auto) => Size::new(w, derive_height(natural, w)),
                (Auto, Pixels(h)) => Size::new(derive_width(natural, h), h),
                (Percent(px), Percent(py)) => Size::new(
                    px / 100.0 * container.width,
                    py / 100.0 * container.height,
                ),
                (Percent(px), Auto) => {
                    let w = px / 100.0 * container.width;
                    Size::new(w, derive_height(natural, w))
                }
                (Auto, Percent(py)) => {
                    let h = py / 100.0 * container.height;
                    Size::new(derive_width(natural, h), h)
                }
                // Both Auto, or mixed px/% — outside the supported
                // grammar. Degrade to cover rather than fail.
                _ => scale_to_box(natural, container, true),
            },
        }
    }
}

/// One axis of a background position.
///
/// Keywords (`left`/`center`/`right`, `top`/`center`/`bottom`) are
/// canonicalized to `Percent(0|50|100)` before reaching the resolver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PositionValue {
    /// Absolute offset in pixels, used verbatim.
    Pixels(f64),
    /// Percentage of the per-axis slack (`container − rendered`).
    Percent(f64),
}

/// Where the rendered box sits inside its container.
///
/// The supported subset of CSS `background-position`. Defaults to
/// `50% 50%` (centered), matching the CSS initial value for a
/// single-keyword position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionSpec {
    pub x: PositionValue,
    pub y: PositionValue,
}

impl Default for PositionSpec {
    fn default() -> Self {
        Self {
            x: PositionValue::Percent(50.0),
            y: PositionValue::Percent(50.0),
        }
    }
}

impl PositionSpec {
    /// Create a position from per-axis values.
    pub const fn new(x: PositionValue, y: PositionValue) -> Self {
        Self { x, y }
    }

    /// Resolve the pixel offset of the rendered box within the container.
    ///
    /// Percentages resolve against the per-axis slack
    /// (`container − rendered`), which is negative when the rendered box
    /// overflows the container; the resulting negative offset is
    /// intentional and must not be clamped here. Non-finite values
    /// resolve to `0`.
    pub fn resolve(self, container: Size, rendered: Size) -> Offset {
        Offset {
            dx: resolve_axis(self.x, container.width - rendered.width),
            dy: resolve_axis(self.y, container.height - rendered.height),
        }
    }
}

fn resolve_axis(value: PositionValue, slack: f64) -> f64 {
    let v = match value {
        PositionValue::Percent(p) => p / 100.0 * slack,
        PositionValue::Pixels(px) => px,
    };
    if v.is_finite() { v } else { 0.0 }
}

/// A container-space target mapped into natural image coordinates.
///
/// Produced by [`map_to_natural`]; turn it into a bounded square crop
/// with [`crop_box`](Self::crop_box).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NaturalTarget {
    /// Target center in natural pixel coordinates.
    pub center: Point,
    /// Target diameter in natural pixels. The X-axis scale is
    /// authoritative: a circular target's dominant visual dimension is
    /// its width.
    pub diameter: f64,
}

impl NaturalTarget {
    /// Square crop centered on the target, clamped inside the image.
    ///
    /// Clamp order is fixed: position first (`x`, `y` pulled into
    /// `[0, natural]`), then size shrunk to whatever remains toward the
    /// far edges. The box is never re-centered after the shrink, so a
    /// target near an edge yields a crop that is smaller and visually
    /// off-center rather than one that spills outside the image. That
    /// is the documented policy, not an accident.
    pub fn crop_box(&self, natural: Size) -> CropBox {
        let half = self.diameter / 2.0;
        let x = (self.center.x - half).clamp(0.0, natural.width);
        let y = (self.center.y - half).clamp(0.0, natural.height);
        let size = self
            .diameter
            .min(natural.width - x)
            .min(natural.height - y);
        CropBox { x, y, size }
    }
}

/// Map a container-space target rect into natural image coordinates.
///
/// `target` and `container_origin` share one absolute coordinate space
/// (page pixels in the measuring use case). `rendered` and `offset` come
/// from [`SizeSpec::resolve`] and [`PositionSpec::resolve`].
pub fn map_to_natural(
    target: Rect,
    container_origin: Point,
    rendered: Size,
    offset: Offset,
    natural: Size,
) -> NaturalTarget {
    let center = target.center();
    // Absolute top-left of the rendered image.
    let image_x = container_origin.x + offset.dx;
    let image_y = container_origin.y + offset.dy;

    let scale_x = natural.width / rendered.width;
    let scale_y = natural.height / rendered.height;

    NaturalTarget {
        center: Point {
            x: (center.x - image_x) * scale_x,
            y: (center.y - image_y) * scale_y,
        },
        diameter: target.width * scale_x,
    }
}

/// Map a target rect into natural space and clamp to a square crop.
///
/// Composition of [`map_to_natural`] and [`NaturalTarget::crop_box`].
pub fn map_and_crop(
    target: Rect,
    container_origin: Point,
    rendered: Size,
    offset: Offset,
    natural: Size,
) -> CropBox {
    map_to_natural(target, container_origin, rendered, offset, natural).crop_box(natural)
}

/// Square crop region in natural image coordinates.
///
/// Invariant (guaranteed by [`NaturalTarget::crop_box`]): fully contained
/// in `[0, natural.width] × [0, natural.height]`, `size >= 0`.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct CropBox {
    pub x: f64,
    pub y: f64,
    /// Side length of the square.
    pub size: f64,
}

impl CropBox {
    /// Right edge (`x + size`).
    pub fn right(&self) -> f64 {
        self.x + self.size
    }

    /// Bottom edge (`y + size`).
    pub fn bottom(&self) -> f64 {
        self.y + self.size
    }

    /// Round to an integer pixel box for a cropping tool.
    ///
    /// Edges round independently (`round(x)`, `round(x + size)`) so the
    /// box stays aligned with the fractional original rather than
    /// accumulating a rounded origin plus a rounded size.
    pub fn to_pixels(&self) -> PixelCrop {
        PixelCrop {
            left: self.x.round() as u32,
            top: self.y.round() as u32,
            right: self.right().round() as u32,
            bottom: self.bottom().round() as u32,
        }
    }
}

/// Integer pixel crop edges, ready for an image cropper.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelCrop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

// ============================================================================
// Internal geometry
// ============================================================================

/// Proportional scale of `natural` to the container: max ratio covers,
/// min ratio contains.
fn scale_to_box(natural: Size, container: Size, cover: bool) -> Size {
    let rx = container.width / natural.width;
    let ry = container.height / natural.height;
    let scale = if cover { rx.max(ry) } else { rx.min(ry) };
    Size {
        width: natural.width * scale,
        height: natural.height * scale,
    }
}

/// Height for a fixed rendered width, preserving natural aspect ratio.
fn derive_height(natural: Size, width: f64) -> f64 {
    width / natural.width * natural.height
}

/// Width for a fixed rendered height, preserving natural aspect ratio.
fn derive_width(natural: Size, height: f64) -> f64 {
    height / natural.height * natural.width
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn assert_size(actual: Size, w: f64, h: f64) {
        assert!(
            close(actual.width, w) && close(actual.height, h),
            "expected {w}×{h}, got {actual:?}"
        );
    }

    // ── SizeSpec::resolve ───────────────────────────────────────────────

    #[test]
    fn cover_wide_image_in_wider_container() {
        // 1500×500 into 1000×300: ratios 0.667 / 0.6 → scale 0.667
        let r = SizeSpec::Cover.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 1000.0, 1000.0 / 3.0);
    }

    #[test]
    fn contain_wide_image_in_wider_container() {
        // Same boxes, min ratio 0.6 → 900×300
        let r = SizeSpec::Contain.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 900.0, 300.0);
    }

    #[test]
    fn cover_exact_aspect_match() {
        let r = SizeSpec::Cover.resolve(Size::new(2480.0, 520.0), Size::new(1240.0, 260.0));
        assert_size(r, 1240.0, 260.0);
    }

    #[test]
    fn cover_upscales_small_image() {
        let r = SizeSpec::Cover.resolve(Size::new(100.0, 100.0), Size::new(1000.0, 300.0));
        assert_size(r, 1000.0, 1000.0);
    }

    #[test]
    fn explicit_both_pixels_verbatim() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Pixels(640.0),
            y: SizeValue::Pixels(200.0),
        };
        let r = spec.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 640.0, 200.0);
    }

    #[test]
    fn explicit_pixels_auto_preserves_aspect() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Pixels(750.0),
            y: SizeValue::Auto,
        };
        let r = spec.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 750.0, 250.0);
    }

    #[test]
    fn explicit_auto_pixels_preserves_aspect() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Auto,
            y: SizeValue::Pixels(250.0),
        };
        let r = spec.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 750.0, 250.0);
    }

    #[test]
    fn explicit_both_percent_resolves_against_container() {
        // Axes resolve independently against the container, not the image.
        let spec = SizeSpec::Explicit {
            x: SizeValue::Percent(50.0),
            y: SizeValue::Percent(100.0),
        };
        let r = spec.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 500.0, 300.0);
    }

    #[test]
    fn explicit_percent_auto_derives_from_resolved_axis() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Percent(30.0),
            y: SizeValue::Auto,
        };
        // 30% of 1000 = 300 wide; height = 300/1500 * 500 = 100
        let r = spec.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 300.0, 100.0);
    }

    #[test]
    fn explicit_auto_percent_derives_from_resolved_axis() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Auto,
            y: SizeValue::Percent(50.0),
        };
        // 50% of 300 = 150 tall; width = 150/500 * 1500 = 450
        let r = spec.resolve(Size::new(1500.0, 500.0), Size::new(1000.0, 300.0));
        assert_size(r, 450.0, 150.0);
    }

    #[test]
    fn explicit_both_auto_falls_back_to_cover() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Auto,
            y: SizeValue::Auto,
        };
        let natural = Size::new(1500.0, 500.0);
        let container = Size::new(1000.0, 300.0);
        assert_eq!(
            spec.resolve(natural, container),
            SizeSpec::Cover.resolve(natural, container)
        );
    }

    #[test]
    fn explicit_mixed_pixels_percent_falls_back_to_cover() {
        let spec = SizeSpec::Explicit {
            x: SizeValue::Pixels(100.0),
            y: SizeValue::Percent(50.0),
        };
        let natural = Size::new(1500.0, 500.0);
        let container = Size::new(1000.0, 300.0);
        assert_eq!(
            spec.resolve(natural, container),
            SizeSpec::Cover.resolve(natural, container)
        );
    }

    #[test]
    fn cover_never_underflows_contain_never_overflows() {
        let naturals = [
            Size::new(1500.0, 500.0),
            Size::new(500.0, 1500.0),
            Size::new(33.0, 777.0),
            Size::new(2480.0, 520.0),
            Size::new(1.0, 1.0),
        ];
        let containers = [
            Size::new(1000.0, 300.0),
            Size::new(300.0, 1000.0),
            Size::new(250.0, 250.0),
        ];
        for natural in naturals {
            for container in containers {
                let cover = SizeSpec::Cover.resolve(natural, container);
                assert!(cover.width >= container.width - EPS, "{natural:?} {container:?}");
                assert!(cover.height >= container.height - EPS, "{natural:?} {container:?}");

                let contain = SizeSpec::Contain.resolve(natural, container);
                assert!(contain.width <= container.width + EPS, "{natural:?} {container:?}");
                assert!(contain.height <= container.height + EPS, "{natural:?} {container:?}");
            }
        }
    }

    // ── PositionSpec::resolve ───────────────────────────────────────────

    #[test]
    fn position_left_center_zero_slack() {
        // "left center" canonicalized: 0% / 50%. Slack (100, 0) → (0, 0).
        let spec = PositionSpec::new(PositionValue::Percent(0.0), PositionValue::Percent(50.0));
        let o = spec.resolve(Size::new(1000.0, 300.0), Size::new(900.0, 300.0));
        assert_eq!(o, Offset::new(0.0, 0.0));
    }

    #[test]
    fn position_fifty_percent_splits_slack() {
        let spec = PositionSpec::default();
        let o = spec.resolve(Size::new(1000.0, 300.0), Size::new(900.0, 300.0));
        assert!(close(o.dx, 50.0));
        assert!(close(o.dy, 0.0));
    }

    #[test]
    fn position_negative_slack_preserved() {
        // Cover overflow: rendered wider than the container. 50% of the
        // negative slack centers the overflow — must not be clamped.
        let spec = PositionSpec::default();
        let o = spec.resolve(Size::new(1000.0, 300.0), Size::new(1200.0, 300.0));
        assert!(close(o.dx, -100.0));
    }

    #[test]
    fn position_pixels_verbatim() {
        let spec = PositionSpec::new(PositionValue::Pixels(13.0), PositionValue::Pixels(-7.5));
        let o = spec.resolve(Size::new(1000.0, 300.0), Size::new(900.0, 250.0));
        assert_eq!(o, Offset::new(13.0, -7.5));
    }

    #[test]
    fn position_non_finite_resolves_to_zero() {
        let spec = PositionSpec::new(
            PositionValue::Pixels(f64::NAN),
            PositionValue::Percent(f64::INFINITY),
        );
        let o = spec.resolve(Size::new(1000.0, 300.0), Size::new(900.0, 250.0));
        assert_eq!(o, Offset::new(0.0, 0.0));
    }

    // ── map_to_natural / crop_box ───────────────────────────────────────

    #[test]
    fn map_interior_target_unclamped() {
        // Worked example: container at origin, contain-resolved 900×300
        // from a 1500×500 natural, avatar 100×100 at (480, 120).
        let t = map_to_natural(
            Rect::new(480.0, 120.0, 100.0, 100.0),
            Point::new(0.0, 0.0),
            Size::new(900.0, 300.0),
            Offset::new(0.0, 0.0),
            Size::new(1500.0, 500.0),
        );
        assert!(close(t.center.x, 530.0 * 5.0 / 3.0));
        assert!(close(t.center.y, 170.0 * 5.0 / 3.0));
        assert!(close(t.diameter, 100.0 * 5.0 / 3.0));

        let b = t.crop_box(Size::new(1500.0, 500.0));
        assert!(close(b.x, 800.0));
        assert!(close(b.y, 200.0));
        assert!(close(b.size, 500.0 / 3.0));
    }

    #[test]
    fn map_respects_container_origin_and_offset() {
        // Shifting the container and the rendered box shifts the relative
        // center by the same amount.
        let t = map_to_natural(
            Rect::new(580.0, 170.0, 100.0, 100.0),
            Point::new(90.0, 40.0),
            Size::new(900.0, 300.0),
            Offset::new(10.0, 10.0),
            Size::new(1500.0, 500.0),
        );
        assert!(close(t.center.x, 530.0 * 5.0 / 3.0));
        assert!(close(t.center.y, 170.0 * 5.0 / 3.0));
    }

    #[test]
    fn map_diameter_uses_x_scale() {
        // Distorted explicit size: X scale 2, Y scale 4. Diameter follows X.
        let t = map_to_natural(
            Rect::new(100.0, 100.0, 50.0, 50.0),
            Point::new(0.0, 0.0),
            Size::new(500.0, 250.0),
            Offset::new(0.0, 0.0),
            Size::new(1000.0, 1000.0),
        );
        assert!(close(t.diameter, 100.0));
    }

    #[test]
    fn crop_clamps_negative_origin_to_zero() {
        // Target near the top-left corner: raw box extends past both
        // near edges; origin clamps to 0, size shrinks to the image.
        let target = NaturalTarget {
            center: Point::new(10.0, 10.0),
            diameter: 120.0,
        };
        let b = target.crop_box(Size::new(100.0, 100.0));
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, 0.0);
        assert!(close(b.size, 100.0));
    }

    #[test]
    fn crop_shrinks_at_far_edge_without_recentering() {
        // Center near the right edge: x stays put, size loses the overhang.
        let target = NaturalTarget {
            center: Point::new(1480.0, 250.0),
            diameter: 200.0,
        };
        let b = target.crop_box(Size::new(1500.0, 500.0));
        assert!(close(b.x, 1380.0));
        assert!(close(b.size, 120.0));
        assert!(b.right() <= 1500.0 + EPS);
    }

    #[test]
    fn crop_invariants_hold_across_sweep() {
        let natural = Size::new(1500.0, 500.0);
        for cx in [-200.0, 0.0, 100.0, 750.0, 1499.0, 1700.0] {
            for cy in [-50.0, 0.0, 250.0, 499.0, 600.0] {
                for d in [10.0, 166.7, 500.0, 2000.0] {
                    let b = NaturalTarget {
                        center: Point::new(cx, cy),
                        diameter: d,
                    }
                    .crop_box(natural);
                    assert!(b.x >= 0.0, "x {b:?}");
                    assert!(b.y >= 0.0, "y {b:?}");
                    assert!(b.right() <= natural.width + EPS, "right {b:?}");
                    assert!(b.bottom() <= natural.height + EPS, "bottom {b:?}");
                }
            }
        }
    }

    #[test]
    fn map_and_crop_is_deterministic() {
        let run = || {
            map_and_crop(
                Rect::new(480.0, 120.0, 100.0, 100.0),
                Point::new(12.5, 3.25),
                Size::new(900.0, 300.0),
                Offset::new(50.0, 0.0),
                Size::new(1500.0, 500.0),
            )
        };
        assert_eq!(run(), run());
    }

    // ── to_pixels ───────────────────────────────────────────────────────

    #[test]
    fn to_pixels_rounds_edges_independently() {
        let b = CropBox {
            x: 57.3228346456693,
            y: 47.0866141732283,
            size: 405.0,
        };
        let p = b.to_pixels();
        assert_eq!(
            p,
            PixelCrop {
                left: 57,
                top: 47,
                right: 462,
                bottom: 452,
            }
        );
        // Edge rounding keeps the span within ±1 of the fractional size.
        assert_eq!(p.right - p.left, 405);
    }
}
